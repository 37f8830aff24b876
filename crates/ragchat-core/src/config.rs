//! Client configuration.
//!
//! Loaded from `~/.config/ragchat/config.toml` by the infrastructure layer.
//! Every field has a default, so an absent or partial file is valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Chat";
pub const DEFAULT_CREDENTIAL_KEY: &str = "token";

/// What `load_conversations` does when nothing is selected yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSelect {
    /// Select the first entry of the list as returned by the backend.
    #[default]
    First,
    /// Leave the selection empty.
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; API paths (`/api/v1/...`) are appended to it.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub default_conversation_title: String,
    pub auto_select: AutoSelect,
    /// Key under which the credential is persisted in local storage.
    pub credential_key: String,
    pub allowed_upload_extensions: Vec<String>,
    pub min_password_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            default_conversation_title: DEFAULT_CONVERSATION_TITLE.to_string(),
            auto_select: AutoSelect::First,
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            allowed_upload_extensions: vec!["txt".to_string(), "md".to_string()],
            min_password_length: 8,
        }
    }
}
