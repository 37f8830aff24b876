//! Login and signup popups.

mod form;
mod popups;

pub use form::{LoginForm, SignupForm};
pub use popups::{AuthPopups, PopupKind};
