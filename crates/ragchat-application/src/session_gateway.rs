use std::sync::Arc;

use ragchat_core::error::{ChatError, Result};
use ragchat_core::session::{AuthApi, AuthRequest, Credential, SessionStore, UserProfile};

/// Login, signup and logout on top of the auth port and the session store.
///
/// Only successful calls touch the store; a failed login leaves the current
/// credential (if any) in place.
pub struct SessionGateway {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
}

impl SessionGateway {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<SessionStore>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Authenticates and publishes the issued credential.
    ///
    /// # Errors
    ///
    /// `Auth` when the backend rejects the credentials or issues no token,
    /// `Transport` when it cannot be reached.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let request = AuthRequest::new(email.trim(), password);
        let response = self.api.login(&request).await?;

        let credential = response
            .credential()
            .ok_or_else(|| ChatError::auth("Login response did not include an access token"))?;

        self.store.establish(credential.clone());
        tracing::info!("[SessionGateway] Logged in as {}", request.email);
        Ok(credential)
    }

    /// Registers an account.
    ///
    /// Returns `None` when the backend creates the account without issuing a
    /// credential; the session store is then left untouched.
    pub async fn signup(&self, email: &str, password: &str) -> Result<Option<Credential>> {
        let request = AuthRequest::new(email.trim(), password);
        let response = self.api.signup(&request).await?;

        let credential = response.credential();
        match credential {
            Some(ref credential) => {
                self.store.establish(credential.clone());
                tracing::info!("[SessionGateway] Signed up and logged in as {}", request.email);
            }
            None => {
                tracing::info!("[SessionGateway] Signed up {} (no token issued)", request.email);
            }
        }
        Ok(credential)
    }

    /// Clears the credential everywhere. Idempotent.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("[SessionGateway] Logged out");
    }

    pub fn current_token(&self) -> Option<Credential> {
        self.store.current_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Fetches the account behind the current credential.
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.api.current_user().await
    }
}
