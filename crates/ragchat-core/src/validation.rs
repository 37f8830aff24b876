//! Local input validation.
//!
//! Everything here runs before any network call; a failure blocks the
//! submission outright.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Loose well-formedness check: something@something.tld, no whitespace.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// A rejected form field or upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: &'static str },

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("unsupported file type '{file_name}' (allowed: {allowed})")]
    UnsupportedFileType { file_name: String, allowed: String },
}

/// Requires a non-blank value.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// Requires a non-blank, well-formed email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Requires a password of at least `min` characters (counted as chars, not bytes).
pub fn validate_password(password: &str, min: usize) -> Result<(), ValidationError> {
    require("password", password)?;
    if password.chars().count() < min {
        return Err(ValidationError::PasswordTooShort { min });
    }
    Ok(())
}

/// Checks a file name against an allow-list of extensions (case-insensitive).
pub fn validate_extension(file_name: &str, allowed: &[String]) -> Result<(), ValidationError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(()),
        _ => Err(ValidationError::UnsupportedFileType {
            file_name: file_name.to_string(),
            allowed: allowed.join(", "),
        }),
    }
}
