//! Domain layer for ragchat.
//!
//! Holds the wire models, the view state, the session store, and the port
//! traits (`AuthApi`, `ConversationGateway`, `CredentialStorage`) that the
//! infrastructure and interaction crates implement.

pub mod config;
pub mod conversation;
pub mod error;
pub mod session;
pub mod validation;

pub use error::{ChatError, Result};
