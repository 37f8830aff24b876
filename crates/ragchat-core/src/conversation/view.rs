use serde::Serialize;

use super::model::{Conversation, Message};

/// Where the selection state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum SelectionState {
    NoSelection,
    Loading(i64),
    Loaded(i64),
}

/// In-memory state rendered by the chat screen.
///
/// `messages` always belongs to `selected_id`: it is emptied when the
/// selection changes and only ever replaced by the detail fetched for the
/// still-selected id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatView {
    /// Newest first once created locally; otherwise in backend order.
    pub conversations: Vec<Conversation>,
    pub selected_id: Option<i64>,
    pub messages: Vec<Message>,
    pub messages_loading: bool,
    /// A message send (or the implicit create preceding it) is in flight.
    pub pending: bool,
    pub sidebar_open: bool,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            conversations: Vec::new(),
            selected_id: None,
            messages: Vec::new(),
            messages_loading: false,
            pending: false,
            sidebar_open: true,
        }
    }
}

impl ChatView {
    pub fn selection_state(&self) -> SelectionState {
        match (self.selected_id, self.messages_loading) {
            (None, _) => SelectionState::NoSelection,
            (Some(id), true) => SelectionState::Loading(id),
            (Some(id), false) => SelectionState::Loaded(id),
        }
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected_id == Some(id)
    }

    /// Makes `id` the selection and drops the previous conversation's messages.
    pub fn select(&mut self, id: i64) {
        self.selected_id = Some(id);
        self.messages.clear();
    }
}
