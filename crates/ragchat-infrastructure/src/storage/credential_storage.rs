//! File-backed credential storage.

use std::path::PathBuf;

use ragchat_core::error::Result;
use ragchat_core::session::{Credential, CredentialStorage};

use super::local_store::LocalStore;
use crate::paths::RagChatPaths;

/// Keeps the credential under one key of the local store.
pub struct FileCredentialStorage {
    store: LocalStore,
    key: String,
}

impl FileCredentialStorage {
    /// Uses `~/.config/ragchat/local_storage.toml` and the given key.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let path = RagChatPaths::local_storage_file()?;
        Ok(Self::with_path(path, key))
    }

    /// Creates a storage at a custom path (for testing).
    pub fn with_path(path: PathBuf, key: impl Into<String>) -> Self {
        Self {
            store: LocalStore::new(path),
            key: key.into(),
        }
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn load(&self) -> Result<Option<Credential>> {
        let token = self.store.get(&self.key)?;
        Ok(token.filter(|t| !t.is_empty()).map(Credential::new))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.store.set(&self.key, credential.as_str())?;
        tracing::debug!(
            "[FileCredentialStorage] Saved credential to {}",
            self.store.path().display()
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        Ok(())
    }
}
