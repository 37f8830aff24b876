use ragchat_core::validation::{self, ValidationError};

/// Fields of the login popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email must be well formed; any non-blank password is accepted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::require("password", &self.password)
    }
}

/// Fields of the signup popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self, min_password_length: usize) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password, min_password_length)
    }
}
