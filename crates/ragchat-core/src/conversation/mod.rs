//! Conversation domain: wire models, view state, and the gateway port.

mod document;
mod gateway;
mod model;
mod view;

pub use document::{Document, UploadReceipt};
pub use gateway::ConversationGateway;
pub use model::{Conversation, ConversationDetail, DeliveryState, Message, MessageRole};
pub use view::{ChatView, SelectionState};
