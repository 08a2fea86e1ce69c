//! Error types shared by the timer, the auth flow and the HTTP layer.

use axum::http::StatusCode;
use thiserror::Error;

use crate::{services::AuthServiceError, validation::FormFieldErrors};

/// Message shown when the auth service cannot be reached.
pub const CONNECTIVITY_MESSAGE: &str =
    "Network error. Check if the authentication service is accessible and try again later.";

/// Message shown when the auth service rejects the credentials.
pub const CREDENTIAL_MESSAGE: &str = "Invalid email or password. Please try again.";

/// Locally detected precondition failures. These never reach the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("subject required")]
    SubjectRequired,

    #[error("session too short")]
    SessionTooShort { elapsed_seconds: u64 },

    #[error("invalid form submission")]
    Form(FormFieldErrors),
}

impl ValidationError {
    /// Toast title for this failure
    pub fn title(&self) -> &'static str {
        match self {
            Self::SubjectRequired => "Subject required",
            Self::SessionTooShort { .. } => "Session too short",
            Self::Form(_) => "Invalid form",
        }
    }

    /// Toast description for this failure
    pub fn description(&self) -> String {
        match self {
            Self::SubjectRequired => {
                "Please select a subject before starting the timer.".to_string()
            }
            Self::SessionTooShort { .. } => {
                "Study sessions should be at least 1 minute long.".to_string()
            }
            Self::Form(errors) => {
                let fields: Vec<&str> = errors.fields().collect();
                format!("Please check the following fields: {}", fields.join(", "))
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FormFieldErrors> {
        match self {
            Self::Form(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Every failure a caller of this crate can observe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The auth service was unreachable.
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity,

    /// The auth service rejected the email/password pair.
    #[error("{}", CREDENTIAL_MESSAGE)]
    Credential,

    /// Anything else the auth service reported, passed through verbatim.
    #[error("{0}")]
    Unknown(String),

    /// Another auth submission is still pending.
    #[error("Another request is already in progress")]
    InFlight,
}

impl AppError {
    /// Classify a raw auth service error.
    ///
    /// `fallback` is used when the service gave no message at all.
    pub fn classify(raw: &AuthServiceError, fallback: &str) -> Self {
        let message = raw.message.trim();
        let lower = message.to_lowercase();

        if message.is_empty() {
            Self::Unknown(fallback.to_string())
        } else if lower.contains("fetch") || lower.contains("network") || lower.contains("connect")
        {
            Self::Connectivity
        } else if lower.contains("invalid login credentials") {
            Self::Credential
        } else {
            Self::Unknown(message.to_string())
        }
    }

    /// Short machine-readable kind, used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Connectivity => "connectivity",
            Self::Credential => "credential",
            Self::Unknown(_) => "unknown",
            Self::InFlight => "in_flight",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Connectivity => StatusCode::SERVICE_UNAVAILABLE,
            Self::Credential => StatusCode::UNAUTHORIZED,
            Self::Unknown(_) => StatusCode::BAD_GATEWAY,
            Self::InFlight => StatusCode::CONFLICT,
        }
    }

    pub fn field_errors(&self) -> Option<&FormFieldErrors> {
        match self {
            Self::Validation(e) => e.field_errors(),
            _ => None,
        }
    }
}
