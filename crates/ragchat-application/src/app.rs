//! Screen-level wiring of the session and conversation use cases.

use std::sync::Arc;

use ragchat_core::config::ClientConfig;
use ragchat_core::conversation::ConversationGateway;
use ragchat_core::error::Result;
use ragchat_core::session::{AuthApi, Credential, SessionStore};

use crate::auth_popup::{AuthPopups, LoginForm, SignupForm};
use crate::conversation::{ConversationController, ControllerOptions};
use crate::session_gateway::SessionGateway;

/// Top-level screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Logged out; only the auth popups are reachable.
    Landing,
    Chat,
}

/// Owns the use cases a front end drives.
pub struct ChatApp {
    pub session: Arc<SessionGateway>,
    pub conversations: Arc<ConversationController>,
    pub popups: AuthPopups,
    screen: Screen,
}

impl ChatApp {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        gateway: Arc<dyn ConversationGateway>,
        store: Arc<SessionStore>,
        config: &ClientConfig,
    ) -> Self {
        let session = Arc::new(SessionGateway::new(auth_api, store));
        let screen = if session.is_authenticated() {
            Screen::Chat
        } else {
            Screen::Landing
        };

        Self {
            popups: AuthPopups::new(session.clone(), config.min_password_length),
            conversations: Arc::new(ConversationController::new(
                gateway,
                ControllerOptions::from(config),
            )),
            session,
            screen,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Submits the login popup.
    ///
    /// When the credential changes (another account, or a first login) the
    /// conversation state of the previous session is dropped. Loading the
    /// new account's conversations is left to the caller so a list failure
    /// is not mistaken for a login failure.
    pub async fn login(&mut self, form: &LoginForm) -> Result<Screen> {
        let previous = self.session.current_token();
        self.screen = self.popups.submit_login(form).await?;
        self.forget_previous_account(previous).await;
        Ok(self.screen)
    }

    pub async fn signup(&mut self, form: &SignupForm) -> Result<Screen> {
        let previous = self.session.current_token();
        self.screen = self.popups.submit_signup(form).await?;
        self.forget_previous_account(previous).await;
        Ok(self.screen)
    }

    async fn forget_previous_account(&self, previous: Option<Credential>) {
        if self.session.current_token() != previous {
            tracing::debug!("[ChatApp] Credential changed, resetting conversation state");
            self.conversations.reset().await;
        }
    }

    /// Clears the credential and every piece of conversation state.
    pub async fn logout(&mut self) {
        self.session.logout();
        self.conversations.reset().await;
        self.popups.close();
        self.screen = Screen::Landing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragchat_core::ChatError;
    use ragchat_core::conversation::{
        Conversation, ConversationDetail, Document, Message, UploadReceipt,
    };
    use ragchat_core::session::{AuthRequest, MemoryCredentialStorage, TokenResponse, UserProfile};
    use std::sync::Mutex;

    /// Backend whose conversation list is swapped by the test to mimic
    /// different accounts.
    struct Backend {
        conversations: Mutex<Vec<i64>>,
        list_error: Mutex<Option<ChatError>>,
    }

    impl Backend {
        fn owning(ids: &[i64]) -> Self {
            Self {
                conversations: Mutex::new(ids.to_vec()),
                list_error: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AuthApi for Backend {
        async fn login(&self, _request: &AuthRequest) -> Result<TokenResponse> {
            Ok(TokenResponse {
                access_token: Some("jwt".to_string()),
                token_type: None,
            })
        }

        async fn signup(&self, _request: &AuthRequest) -> Result<TokenResponse> {
            Ok(TokenResponse {
                access_token: None,
                token_type: None,
            })
        }

        async fn current_user(&self) -> Result<UserProfile> {
            Err(ChatError::internal("not used"))
        }
    }

    #[async_trait]
    impl ConversationGateway for Backend {
        async fn list_conversations(&self) -> Result<Vec<Conversation>> {
            if let Some(err) = self.list_error.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .map(|id| Conversation {
                    id: *id,
                    title: format!("Chat {id}"),
                })
                .collect())
        }

        async fn create_conversation(&self, title: &str) -> Result<Conversation> {
            Ok(Conversation {
                id: 99,
                title: title.to_string(),
            })
        }

        async fn get_conversation(&self, id: i64) -> Result<ConversationDetail> {
            Ok(ConversationDetail {
                id,
                title: format!("Chat {id}"),
                messages: vec![Message::assistant(format!("history of {id}"))],
            })
        }

        async fn send_message(&self, _id: i64, content: &str) -> Result<Message> {
            Ok(Message::assistant(content))
        }

        async fn upload_document(&self, _document: &Document) -> Result<UploadReceipt> {
            Ok(UploadReceipt { message: None })
        }
    }

    fn app_with(storage: MemoryCredentialStorage, backend: Arc<Backend>) -> ChatApp {
        let store = Arc::new(SessionStore::hydrate(Arc::new(storage)));
        ChatApp::new(backend.clone(), backend, store, &ClientConfig::default())
    }

    fn app(storage: MemoryCredentialStorage) -> ChatApp {
        app_with(storage, Arc::new(Backend::owning(&[1])))
    }

    #[test]
    fn test_initial_screen_follows_stored_credential() {
        assert_eq!(app(MemoryCredentialStorage::new()).screen(), Screen::Landing);
        assert_eq!(
            app(MemoryCredentialStorage::with_credential(Credential::new("t"))).screen(),
            Screen::Chat
        );
    }

    #[tokio::test]
    async fn test_login_enters_chat_then_conversations_load() {
        let mut app = app(MemoryCredentialStorage::new());

        let screen = app
            .login(&LoginForm::new("a@b.co", "password"))
            .await
            .unwrap();
        app.conversations.load_conversations().await.unwrap();

        assert_eq!(screen, Screen::Chat);
        let view = app.conversations.view().await;
        assert_eq!(view.selected_id, Some(1));
        assert_eq!(view.messages, vec![Message::assistant("history of 1")]);
    }

    #[tokio::test]
    async fn test_login_as_other_account_drops_previous_conversations() {
        let backend = Arc::new(Backend::owning(&[1]));
        let mut app = app_with(
            MemoryCredentialStorage::with_credential(Credential::new("alice")),
            backend.clone(),
        );
        app.conversations.load_conversations().await.unwrap();
        assert_eq!(app.conversations.view().await.selected_id, Some(1));

        *backend.conversations.lock().unwrap() = vec![2];
        app.login(&LoginForm::new("bob@b.co", "password"))
            .await
            .unwrap();

        let view = app.conversations.view().await;
        assert_eq!(view.selected_id, None);
        assert!(view.conversations.is_empty());
        assert!(view.messages.is_empty());

        app.conversations.load_conversations().await.unwrap();
        let view = app.conversations.view().await;
        assert_eq!(view.selected_id, Some(2));
        assert_eq!(view.messages, vec![Message::assistant("history of 2")]);
    }

    #[tokio::test]
    async fn test_login_with_same_credential_keeps_selection() {
        let mut app = app(MemoryCredentialStorage::with_credential(Credential::new("jwt")));
        app.conversations.load_conversations().await.unwrap();

        app.login(&LoginForm::new("a@b.co", "password"))
            .await
            .unwrap();

        assert_eq!(app.conversations.view().await.selected_id, Some(1));
    }

    #[tokio::test]
    async fn test_list_failure_after_login_does_not_fail_login() {
        let backend = Arc::new(Backend::owning(&[1]));
        *backend.list_error.lock().unwrap() = Some(ChatError::http(503, "Service Unavailable"));
        let mut app = app_with(MemoryCredentialStorage::new(), backend);

        let screen = app
            .login(&LoginForm::new("a@b.co", "password"))
            .await
            .unwrap();

        assert_eq!(screen, Screen::Chat);
        assert!(app.session.is_authenticated());
        assert!(app.conversations.load_conversations().await.is_err());
        assert_eq!(app.screen(), Screen::Chat);
    }

    #[tokio::test]
    async fn test_signup_without_token_leaves_state_alone() {
        let mut app = app(MemoryCredentialStorage::new());

        let screen = app
            .signup(&SignupForm::new("a@b.co", "password"))
            .await
            .unwrap();

        assert_eq!(screen, Screen::Chat);
        assert!(!app.session.is_authenticated());
        assert!(app.conversations.view().await.conversations.is_empty());
    }

    #[tokio::test]
    async fn test_logout_returns_to_landing_and_clears_view() {
        let mut app = app(MemoryCredentialStorage::with_credential(Credential::new("t")));
        app.conversations.load_conversations().await.unwrap();

        app.logout().await;

        assert_eq!(app.screen(), Screen::Landing);
        assert!(!app.session.is_authenticated());
        let view = app.conversations.view().await;
        assert!(view.conversations.is_empty());
        assert_eq!(view.selected_id, None);
    }
}
