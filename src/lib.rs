//! StudyBuddy - dashboard backend for the study-session tracker
//!
//! This library provides the session timer, form validation and the auth
//! flow in front of an external identity service, exposed over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, ValidationError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
