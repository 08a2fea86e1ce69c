//! Login and registration form validation

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters";
pub const NAME_MESSAGE: &str = "Name must be at least 2 characters";

const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 2;

// Local part may not start with a dot or contain "..", checked separately
// since the regex crate has no lookahead.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern is valid")
});

/// Check an address against standard email syntax
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

fn has_min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// Field name to message, one entry per failing field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFieldErrors(BTreeMap<String, String>);

impl FormFieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation unless the field already has one
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Convert into a `Result`, `Ok` when no field failed
    pub fn into_result(self) -> Result<(), FormFieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Credentials submitted by the login form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Run every field rule and collect the violations
    pub fn validate(&self) -> FormFieldErrors {
        let mut errors = FormFieldErrors::new();
        self.check_into(&mut errors);
        errors
    }

    fn check_into(&self, errors: &mut FormFieldErrors) {
        if !is_valid_email(&self.email) {
            errors.add("email", EMAIL_MESSAGE);
        }
        if !has_min_chars(&self.password, MIN_PASSWORD_LEN) {
            errors.add("password", PASSWORD_MESSAGE);
        }
    }
}

/// Registration form: login credentials plus a display name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn credentials(&self) -> LoginForm {
        LoginForm::new(self.email.clone(), self.password.clone())
    }

    pub fn validate(&self) -> FormFieldErrors {
        let mut errors = FormFieldErrors::new();
        self.credentials().check_into(&mut errors);
        if !has_min_chars(&self.name, MIN_NAME_LEN) {
            errors.add("name", NAME_MESSAGE);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_login_has_no_errors() {
        let errors = LoginForm::new("ada@example.com", "abcdef").validate();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_bad_email_only() {
        let errors = LoginForm::new("not-an-email", "abcdef").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some(EMAIL_MESSAGE));
    }

    #[test]
    fn test_short_password_only() {
        let errors = LoginForm::new("ada@example.com", "abc").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password"), Some(PASSWORD_MESSAGE));
    }

    #[test]
    fn test_register_short_name_adds_to_other_errors() {
        let errors = RegisterForm::new("A", "nope", "abc").validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some(NAME_MESSAGE));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));

        let errors = RegisterForm::new("A", "ada@example.com", "abcdef").validate();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_first_violation_wins() {
        let mut errors = FormFieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email(".ada@example.com"));
        assert!(!is_valid_email("ada..b@example.com"));
        assert!(!is_valid_email("ada.@example.com"));
    }

    #[test]
    fn test_length_counts_characters() {
        // Two characters, four bytes
        let errors = RegisterForm::new("éé", "ada@example.com", "abcdef").validate();
        assert!(errors.is_empty());
    }
}
