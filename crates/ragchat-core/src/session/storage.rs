//! Durable credential storage port.

use std::sync::Mutex;

use super::Credential;
use crate::error::Result;

/// Medium that keeps the credential across process restarts.
///
/// Calls are synchronous: the value is a single short string and every
/// caller already runs between network awaits.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Option<Credential>>;

    fn save(&self, credential: &Credential) -> Result<()>;

    /// Removes the stored credential. Removing an absent credential is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local storage, used in tests and when no config directory exists.
#[derive(Default)]
pub struct MemoryCredentialStorage {
    credential: Mutex<Option<Credential>>,
}

impl MemoryCredentialStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.credential.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.credential.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credential.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
