//! Error types for the ragchat client.

use thiserror::Error;

use crate::validation::ValidationError;

/// A shared error type for the whole client.
///
/// Network failures are split the way the user sees them: `Auth` for
/// rejected or missing credentials, `Transport` for an unreachable backend,
/// and `Http` for any other non-success response. `Validation` never
/// reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Bad credentials, or an expired/missing token on a gated call
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Backend unreachable, timed out, or the response body could not be read
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-success HTTP status other than an authorization failure
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Local input validation failure
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Durable client-side storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text suitable for showing inline to the user.
    ///
    /// Server-provided messages are returned verbatim; everything else falls
    /// back to the `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth { message } | Self::Http { message, .. } => message.clone(),
            Self::Validation(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
