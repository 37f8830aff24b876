//! Conversation gateway trait.

use async_trait::async_trait;

use super::document::{Document, UploadReceipt};
use super::model::{Conversation, ConversationDetail, Message};
use crate::error::Result;

/// Request/response access to the chat backend.
///
/// Implementations attach the current credential to every call and perform
/// no retries: a failed call returns the transport/HTTP error as is.
#[async_trait]
pub trait ConversationGateway: Send + Sync {
    /// Lists the user's conversations in backend order.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    async fn create_conversation(&self, title: &str) -> Result<Conversation>;

    /// Fetches one conversation with its message history.
    async fn get_conversation(&self, id: i64) -> Result<ConversationDetail>;

    /// Appends a user message and returns the backend's reply message.
    async fn send_message(&self, conversation_id: i64, content: &str) -> Result<Message>;

    /// Uploads a document to the ingestion endpoint.
    async fn upload_document(&self, document: &Document) -> Result<UploadReceipt>;
}
