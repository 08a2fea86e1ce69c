//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    services::{Session, Toast, User},
    state::{TimerState, TimerStatus},
    timer::StudySession,
    validation::FormFieldErrors,
};

/// Timer snapshot with the elapsed time pre-formatted for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub status: TimerStatus,
    pub elapsed_seconds: u64,
    pub display: String,
    pub subject: Option<String>,
    pub topic: Option<String>,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            display: state.display(),
            status: state.status,
            elapsed_seconds: state.elapsed_seconds,
            subject: state.subject,
            topic: state.topic,
        }
    }
}

/// Response for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<StudySession>,
}

impl TimerResponse {
    pub fn new(status: &str, message: String, timer: TimerState) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
            session: None,
        }
    }

    pub fn ok(message: String, timer: TimerState) -> Self {
        Self::new("ok", message, timer)
    }

    pub fn error(err: &AppError, timer: TimerState) -> Self {
        Self::new("error", err.to_string(), timer)
    }

    pub fn with_session(mut self, session: StudySession) -> Self {
        self.session = Some(session);
        self
    }
}

/// Response for auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormFieldErrors>,
}

impl AuthResponse {
    pub fn ok(message: &str, user: Option<User>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            kind: None,
            user,
            redirect: None,
            errors: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            status: "error".to_string(),
            message: err.to_string(),
            timestamp: Utc::now(),
            kind: Some(err.kind().to_string()),
            user: None,
            redirect: None,
            errors: err.field_errors().cloned(),
        }
    }

    pub fn redirect_to(mut self, path: &str) -> Self {
        self.redirect = Some(path.to_string());
        self
    }
}

/// Current session as seen by the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub signed_in: bool,
    pub session: Option<Session>,
}

/// Reply for features that are not built yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComingSoonResponse {
    pub status: String,
    pub feature: String,
    pub message: String,
}

impl ComingSoonResponse {
    pub fn new(feature: &str, message: &str) -> Self {
        Self {
            status: "coming_soon".to_string(),
            feature: feature.to_string(),
            message: message.to_string(),
        }
    }
}

/// Recently emitted toasts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Toast>,
}

/// Dashboard status with timer and user information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub user: Option<User>,
    pub auth_pending: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
