//! Application layer for ragchat.
//!
//! Use cases that coordinate the domain ports (`AuthApi`,
//! `ConversationGateway`) with client-side state: the session gateway, the
//! conversation controller and the auth popups.

pub mod app;
pub mod auth_popup;
pub mod conversation;
pub mod session_gateway;

pub use app::{ChatApp, Screen};
pub use auth_popup::{AuthPopups, LoginForm, PopupKind, SignupForm};
pub use conversation::{ConversationController, ControllerOptions, SelectOutcome, SendOutcome};
pub use session_gateway::SessionGateway;
