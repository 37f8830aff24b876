use std::sync::Arc;

use ragchat_core::config::{AutoSelect, ClientConfig};
use ragchat_core::conversation::{
    ChatView, Conversation, ConversationGateway, DeliveryState, Document, Message, MessageRole,
    UploadReceipt,
};
use ragchat_core::error::Result;
use ragchat_core::validation;
use tokio::sync::RwLock;

/// Behavioral knobs taken from [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub default_title: String,
    pub auto_select: AutoSelect,
    pub allowed_upload_extensions: Vec<String>,
}

impl From<&ClientConfig> for ControllerOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            default_title: config.default_conversation_title.clone(),
            auto_select: config.auto_select,
            allowed_upload_extensions: config.allowed_upload_extensions.clone(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Whether a fetched conversation detail made it into the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Applied,
    /// The selection moved on before the fetch resolved.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input; nothing happened.
    Ignored,
    Sent {
        conversation_id: i64,
        reply: Message,
    },
}

struct ControllerState {
    view: ChatView,
    sends_in_flight: usize,
}

impl ControllerState {
    fn begin_send(&mut self) {
        self.sends_in_flight += 1;
        self.view.pending = true;
    }

    fn finish_send(&mut self) {
        self.sends_in_flight = self.sends_in_flight.saturating_sub(1);
        self.view.pending = self.sends_in_flight > 0;
    }

    /// Prepends a freshly created conversation and selects it.
    fn adopt_new(&mut self, conversation: Conversation) {
        let id = conversation.id;
        self.view.conversations.retain(|c| c.id != id);
        self.view.conversations.insert(0, conversation);
        self.view.select(id);
        self.view.messages_loading = false;
    }

    /// Updates the delivery state of the newest pending copy of `content`.
    fn settle_optimistic(&mut self, content: &str, delivery: DeliveryState) {
        if let Some(message) = self.view.messages.iter_mut().rev().find(|m| {
            m.role == MessageRole::User
                && m.delivery == DeliveryState::Pending
                && m.content == content
        }) {
            message.delivery = delivery;
        }
    }
}

/// Coordinates conversation gateway calls with the in-memory chat view.
///
/// State is only touched between awaits; no lock is held across a network
/// call. The one ordering rule: a result is applied to the message list
/// only if the conversation it was requested for is still selected.
pub struct ConversationController {
    gateway: Arc<dyn ConversationGateway>,
    state: RwLock<ControllerState>,
    options: ControllerOptions,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn ConversationGateway>, options: ControllerOptions) -> Self {
        Self {
            gateway,
            state: RwLock::new(ControllerState {
                view: ChatView::default(),
                sends_in_flight: 0,
            }),
            options,
        }
    }

    /// Returns a snapshot of the current view.
    pub async fn view(&self) -> ChatView {
        self.state.read().await.view.clone()
    }

    /// Fetches the conversation list and auto-selects per the configured policy.
    ///
    /// With [`AutoSelect::First`] and nothing selected, the first entry of the
    /// list (backend order) is selected and its messages loaded.
    pub async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let conversations = self.gateway.list_conversations().await?;
        tracing::debug!(
            "[ConversationController] Loaded {} conversations",
            conversations.len()
        );

        let auto_target = {
            let mut state = self.state.write().await;
            state.view.conversations = conversations.clone();
            match self.options.auto_select {
                AutoSelect::First if state.view.selected_id.is_none() => {
                    conversations.first().cloned()
                }
                _ => None,
            }
        };

        if let Some(first) = auto_target {
            self.select_conversation(&first).await?;
        }

        Ok(conversations)
    }

    /// Selects `conversation` and loads its messages.
    ///
    /// The selection changes before the fetch is issued. The fetched detail
    /// (or failure) is dropped if another conversation was selected in the
    /// meantime.
    pub async fn select_conversation(&self, conversation: &Conversation) -> Result<SelectOutcome> {
        let target = conversation.id;
        {
            let mut state = self.state.write().await;
            state.view.select(target);
            state.view.messages_loading = true;
        }
        tracing::info!("[ConversationController] Selected conversation {}", target);

        let result = self.gateway.get_conversation(target).await;

        let mut state = self.state.write().await;
        if !state.view.is_selected(target) {
            tracing::debug!(
                "[ConversationController] Discarding stale detail for {} (now {:?})",
                target,
                state.view.selected_id
            );
            return Ok(SelectOutcome::Discarded);
        }

        state.view.messages_loading = false;
        let detail = result?;
        state.view.messages = detail.messages;
        Ok(SelectOutcome::Applied)
    }

    /// Creates a conversation with the default title, puts it first and selects it.
    pub async fn start_new_conversation(&self) -> Result<Conversation> {
        let conversation = self
            .gateway
            .create_conversation(&self.options.default_title)
            .await?;
        tracing::info!(
            "[ConversationController] Started conversation {}",
            conversation.id
        );

        self.state.write().await.adopt_new(conversation.clone());
        Ok(conversation)
    }

    /// Sends `text` to the selected conversation, creating one first if needed.
    ///
    /// The user message is shown immediately as `Pending`. On success it is
    /// marked `Delivered` and the reply appended; on failure it stays in the
    /// list marked `Failed`.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        let content = text.to_string();

        let selected = {
            let mut state = self.state.write().await;
            state.begin_send();
            state.view.selected_id
        };

        let conversation_id = match selected {
            Some(id) => id,
            None => match self
                .gateway
                .create_conversation(&self.options.default_title)
                .await
            {
                Ok(conversation) => {
                    let id = conversation.id;
                    tracing::info!(
                        "[ConversationController] Created conversation {} for first message",
                        id
                    );
                    self.state.write().await.adopt_new(conversation);
                    id
                }
                Err(e) => {
                    self.state.write().await.finish_send();
                    return Err(e);
                }
            },
        };

        {
            let mut state = self.state.write().await;
            if state.view.is_selected(conversation_id) {
                state
                    .view
                    .messages
                    .push(Message::user(content.clone()).with_delivery(DeliveryState::Pending));
            }
        }

        let result = self.gateway.send_message(conversation_id, &content).await;

        let mut state = self.state.write().await;
        state.finish_send();
        let still_selected = state.view.is_selected(conversation_id);

        match result {
            Ok(reply) => {
                if still_selected {
                    state.settle_optimistic(&content, DeliveryState::Delivered);
                    state.view.messages.push(reply.clone());
                } else {
                    tracing::debug!(
                        "[ConversationController] Reply for {} arrived after selection changed",
                        conversation_id
                    );
                }
                Ok(SendOutcome::Sent {
                    conversation_id,
                    reply,
                })
            }
            Err(e) => {
                if still_selected {
                    state.settle_optimistic(&content, DeliveryState::Failed);
                }
                tracing::warn!(
                    "[ConversationController] Send to {} failed: {}",
                    conversation_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Uploads a document for retrieval. Conversation state is not touched.
    ///
    /// # Errors
    ///
    /// `Validation` (without any network call) when the extension is not in
    /// the allow-list; otherwise whatever the gateway returns.
    pub async fn upload_document(&self, document: &Document) -> Result<UploadReceipt> {
        validation::validate_extension(
            &document.file_name,
            &self.options.allowed_upload_extensions,
        )?;

        let receipt = self.gateway.upload_document(document).await?;
        tracing::info!(
            "[ConversationController] Uploaded {} for retrieval",
            document.file_name
        );
        Ok(receipt)
    }

    /// Flips the sidebar and returns the new state.
    pub async fn toggle_sidebar(&self) -> bool {
        let mut state = self.state.write().await;
        state.view.sidebar_open = !state.view.sidebar_open;
        state.view.sidebar_open
    }

    /// Drops every conversation-related piece of state, e.g. after logout.
    ///
    /// Results of requests still in flight are discarded on arrival since
    /// nothing is selected any more.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let sidebar_open = state.view.sidebar_open;
        state.view = ChatView {
            sidebar_open,
            pending: state.sends_in_flight > 0,
            ..ChatView::default()
        };
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
