use std::sync::Arc;

use ragchat_core::error::{ChatError, Result};

use super::form::{LoginForm, SignupForm};
use crate::app::Screen;
use crate::session_gateway::SessionGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Login,
    Signup,
}

/// Which auth popup is open, plus the error shown inside it.
///
/// Opening one popup replaces the other; at most one is ever visible.
pub struct AuthPopups {
    active: Option<PopupKind>,
    error: Option<String>,
    gateway: Arc<SessionGateway>,
    min_password_length: usize,
}

impl AuthPopups {
    pub fn new(gateway: Arc<SessionGateway>, min_password_length: usize) -> Self {
        Self {
            active: None,
            error: None,
            gateway,
            min_password_length,
        }
    }

    pub fn show_login(&mut self) {
        self.open(PopupKind::Login);
    }

    pub fn show_signup(&mut self) {
        self.open(PopupKind::Signup);
    }

    pub fn close(&mut self) {
        self.active = None;
        self.error = None;
    }

    pub fn active(&self) -> Option<PopupKind> {
        self.active
    }

    pub fn is_visible(&self, kind: PopupKind) -> bool {
        self.active == Some(kind)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn open(&mut self, kind: PopupKind) {
        self.active = Some(kind);
        self.error = None;
    }

    /// Validates and submits the login form.
    ///
    /// On success the popup closes and the chat screen is returned. On any
    /// failure the popup stays open with the error message set.
    pub async fn submit_login(&mut self, form: &LoginForm) -> Result<Screen> {
        self.open(PopupKind::Login);
        if let Err(err) = form.validate() {
            return Err(self.fail(err.into()));
        }

        match self.gateway.login(&form.email, &form.password).await {
            Ok(_) => {
                self.close();
                Ok(Screen::Chat)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Validates and submits the signup form.
    ///
    /// A signup that issues no credential still closes the popup; the chat
    /// screen then prompts for login on its first gated call.
    pub async fn submit_signup(&mut self, form: &SignupForm) -> Result<Screen> {
        self.open(PopupKind::Signup);
        if let Err(err) = form.validate(self.min_password_length) {
            return Err(self.fail(err.into()));
        }

        match self.gateway.signup(&form.email, &form.password).await {
            Ok(_) => {
                self.close();
                Ok(Screen::Chat)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: ChatError) -> ChatError {
        tracing::debug!("[AuthPopups] Submission failed: {}", err);
        self.error = Some(err.user_message());
        err
    }
}
