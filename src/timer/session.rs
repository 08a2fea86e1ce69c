//! Study sessions and the checks that gate them

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, utils::format_duration};

/// Shortest session that may be saved
pub const MIN_SESSION_SECONDS: u64 = 60;

/// Reject an empty or whitespace-only subject
pub fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::SubjectRequired);
    }
    Ok(())
}

/// Reject sessions shorter than [`MIN_SESSION_SECONDS`]
pub fn validate_duration(elapsed_seconds: u64) -> Result<(), ValidationError> {
    if elapsed_seconds < MIN_SESSION_SECONDS {
        return Err(ValidationError::SessionTooShort { elapsed_seconds });
    }
    Ok(())
}

/// A completed block of study time. Only lives long enough to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub subject: String,
    pub topic: Option<String>,
    pub duration_seconds: u64,
}

impl StudySession {
    pub fn new(
        subject: &str,
        topic: Option<&str>,
        duration_seconds: u64,
    ) -> Result<Self, ValidationError> {
        validate_subject(subject)?;
        validate_duration(duration_seconds)?;

        Ok(Self {
            subject: subject.to_string(),
            topic: topic.map(str::to_string),
            duration_seconds,
        })
    }

    /// `"physics (Mechanics): 1m 0s"`, or without the parentheses when no topic was set
    pub fn summary(&self) -> String {
        let duration = format_duration(self.duration_seconds);
        match &self.topic {
            Some(topic) => format!("{} ({}): {}", self.subject, topic, duration),
            None => format!("{}: {}", self.subject, duration),
        }
    }
}
