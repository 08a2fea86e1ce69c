//! Study session timer
//!
//! The engine owns the elapsed-time counter and its tick task; the session
//! module holds the save-time checks and the resulting [`StudySession`].

pub mod catalog;
pub mod engine;
pub mod session;

// Re-export main types
pub use catalog::{find_template, QuickStartTemplate, Subject, QUICK_START_TEMPLATES, SUBJECTS};
pub use engine::TimerEngine;
pub use session::{validate_duration, validate_subject, StudySession, MIN_SESSION_SECONDS};
