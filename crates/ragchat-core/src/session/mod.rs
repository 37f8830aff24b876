//! Session domain: the credential, where it is stored, and who may observe it.

mod auth_api;
mod credential;
mod observable;
mod storage;
mod store;

pub use auth_api::{AuthApi, AuthRequest, TokenResponse, UserProfile};
pub use credential::Credential;
pub use observable::{Observable, SubscriptionId};
pub use storage::{CredentialStorage, MemoryCredentialStorage};
pub use store::SessionStore;
