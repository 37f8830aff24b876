//! Authentication port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Credential;
use crate::error::Result;

/// Body of the login and signup calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl AuthRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Token response; signup may omit the token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Returns the issued credential, treating an empty token as absent.
    pub fn credential(&self) -> Option<Credential> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(Credential::new)
    }
}

/// The account behind the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Network side of authentication. Implementations never touch the session store.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &AuthRequest) -> Result<TokenResponse>;

    async fn signup(&self, request: &AuthRequest) -> Result<TokenResponse>;

    /// Gated call returning the account of the current credential.
    async fn current_user(&self) -> Result<UserProfile>;
}
