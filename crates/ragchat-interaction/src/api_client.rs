//! ApiClient - REST implementation of the auth and conversation ports.
//!
//! Every gated call reads the credential from the injected [`SessionStore`]
//! at request time, so a login or logout is picked up by the next call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragchat_core::config::ClientConfig;
use ragchat_core::conversation::{
    Conversation, ConversationDetail, ConversationGateway, Document, Message, MessageRole,
    UploadReceipt,
};
use ragchat_core::error::{ChatError, Result};
use ragchat_core::session::{AuthApi, AuthRequest, SessionStore, TokenResponse, UserProfile};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_PREFIX: &str = "/api/v1";

/// HTTP client for the chat backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client with default reqwest settings.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Builds a client honoring the configured base URL and request timeout.
    pub fn from_config(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.base_url.clone(), session))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/chat/conversations`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Attaches `Authorization: Bearer <token>` when a credential is held.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(credential) => builder.header(AUTHORIZATION, credential.bearer()),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ChatError::transport(format!("Failed to parse response: {e}")))
    }

    async fn post_credentials(&self, path: &str, request: &AuthRequest) -> Result<TokenResponse> {
        let builder = self.client.post(self.endpoint(path)).json(request);
        self.execute(builder).await.map_err(client_error_as_auth)
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &AuthRequest) -> Result<TokenResponse> {
        tracing::debug!("[ApiClient] POST /login");
        self.post_credentials("/login", request).await
    }

    async fn signup(&self, request: &AuthRequest) -> Result<TokenResponse> {
        tracing::debug!("[ApiClient] POST /signup");
        self.post_credentials("/signup", request).await
    }

    async fn current_user(&self) -> Result<UserProfile> {
        let builder = self.authorized(self.client.get(self.endpoint("/users/me")));
        self.execute(builder).await
    }
}

#[async_trait]
impl ConversationGateway for ApiClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        tracing::debug!("[ApiClient] GET /chat/conversations");
        let builder = self.authorized(self.client.get(self.endpoint("/chat/conversations")));
        self.execute(builder).await
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        tracing::debug!("[ApiClient] POST /chat/conversations");
        let builder = self.authorized(
            self.client
                .post(self.endpoint("/chat/conversations"))
                .json(&CreateConversationBody { title }),
        );
        self.execute(builder).await
    }

    async fn get_conversation(&self, id: i64) -> Result<ConversationDetail> {
        tracing::debug!("[ApiClient] GET /chat/conversations/{}", id);
        let builder = self.authorized(
            self.client
                .get(self.endpoint(&format!("/chat/conversations/{id}"))),
        );
        self.execute(builder).await
    }

    async fn send_message(&self, conversation_id: i64, content: &str) -> Result<Message> {
        tracing::debug!(
            "[ApiClient] POST /chat/conversations/{}/messages",
            conversation_id
        );
        let builder = self.authorized(
            self.client
                .post(self.endpoint(&format!(
                    "/chat/conversations/{conversation_id}/messages"
                )))
                .json(&SendMessageBody {
                    role: MessageRole::User,
                    content,
                }),
        );
        self.execute(builder).await
    }

    async fn upload_document(&self, document: &Document) -> Result<UploadReceipt> {
        tracing::debug!(
            "[ApiClient] POST /rag/upload ({}, {} bytes)",
            document.file_name,
            document.byte_len()
        );
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(&document.content_type)
            .map_err(|e| {
                ChatError::internal(format!(
                    "Invalid content type '{}': {e}",
                    document.content_type
                ))
            })?;
        let form = Form::new().part("file", part);

        let builder = self.authorized(self.client.post(self.endpoint("/rag/upload")).multipart(form));
        self.execute(builder).await
    }
}

#[derive(Serialize)]
struct CreateConversationBody<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    role: MessageRole,
    content: &'a str,
}

/// Error payloads seen from the backend: `{"message": ...}` or `{"detail": ...}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn extract_error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.to_string();
    };

    if let Some(message) = parsed.message {
        return message;
    }

    match parsed.detail {
        Some(serde_json::Value::String(detail)) => detail,
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

fn map_http_error(status: StatusCode, body: &str) -> ChatError {
    let mut message = extract_error_message(body);
    if message.trim().is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::auth(message),
        _ => ChatError::http(status.as_u16(), message),
    }
}

fn map_transport_error(err: reqwest::Error) -> ChatError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ChatError::transport(format!("Backend {kind}: {err}"))
}

/// Login/signup rejections (any 4xx) are credential problems from the user's view.
fn client_error_as_auth(err: ChatError) -> ChatError {
    match err {
        ChatError::Http { status, message } if (400..500).contains(&status) => {
            ChatError::auth(message)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::session::{Credential, MemoryCredentialStorage};

    fn client(base_url: &str) -> ApiClient {
        let session = Arc::new(SessionStore::hydrate(Arc::new(MemoryCredentialStorage::new())));
        ApiClient::new(base_url, session)
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let api = client("http://localhost:8000/");
        assert_eq!(
            api.endpoint("/chat/conversations"),
            "http://localhost:8000/api/v1/chat/conversations"
        );
    }

    #[test]
    fn test_authorized_reads_current_token() {
        let session = Arc::new(SessionStore::hydrate(Arc::new(MemoryCredentialStorage::new())));
        let api = ApiClient::new("http://localhost:8000", session.clone());

        let request = api
            .authorized(api.client.get(api.endpoint("/users/me")))
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        session.establish(Credential::new("tok"));
        let request = api
            .authorized(api.client.get(api.endpoint("/users/me")))
            .build()
            .unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn test_map_http_error_variants() {
        assert_eq!(
            map_http_error(StatusCode::UNAUTHORIZED, r#"{"detail": "Could not validate credentials"}"#),
            ChatError::auth("Could not validate credentials")
        );
        assert_eq!(
            map_http_error(StatusCode::NOT_FOUND, r#"{"detail": "Conversation not found"}"#),
            ChatError::http(404, "Conversation not found")
        );
        assert_eq!(
            map_http_error(StatusCode::BAD_REQUEST, r#"{"message": "Email taken"}"#),
            ChatError::http(400, "Email taken")
        );
        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream down"),
            ChatError::http(502, "upstream down")
        );
        assert_eq!(
            map_http_error(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ChatError::http(500, "Internal Server Error")
        );
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let message = extract_error_message(r#"{"detail": [{"msg": "field required"}]}"#);
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_client_error_as_auth() {
        assert_eq!(
            client_error_as_auth(ChatError::http(400, "Incorrect email or password")),
            ChatError::auth("Incorrect email or password")
        );
        assert_eq!(
            client_error_as_auth(ChatError::http(503, "down")),
            ChatError::http(503, "down")
        );
    }
}
