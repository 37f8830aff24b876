//! Conversation use cases: list, select, create, send and upload.

mod controller;

pub use controller::{ConversationController, ControllerOptions, SelectOutcome, SendOutcome};
