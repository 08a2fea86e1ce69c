//! Form validation module
//!
//! Field rules for the login and registration forms.

pub mod forms;

// Re-export main types
pub use forms::{is_valid_email, FormFieldErrors, LoginForm, RegisterForm};
