//! Durable client-side storage.

mod credential_storage;
mod local_store;

pub use credential_storage::FileCredentialStorage;
pub use local_store::{LocalStore, LocalStoreError};
