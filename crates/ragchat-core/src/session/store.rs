use std::sync::Arc;

use super::observable::{Observable, SubscriptionId};
use super::storage::CredentialStorage;
use super::Credential;

/// The injected session state: current credential, durable and observable.
///
/// Exactly one instance exists per running client and is shared as
/// `Arc<SessionStore>` with every component that reads or writes the
/// credential.
pub struct SessionStore {
    credential: Observable<Option<Credential>>,
    storage: Arc<dyn CredentialStorage>,
}

impl SessionStore {
    /// Creates a store re-hydrated from `storage`.
    ///
    /// An unreadable medium starts the session logged out rather than failing
    /// startup.
    pub fn hydrate(storage: Arc<dyn CredentialStorage>) -> Self {
        let initial = match storage.load() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to load persisted credential: {}", e);
                None
            }
        };

        if initial.is_some() {
            tracing::info!("[SessionStore] Restored persisted credential");
        }

        Self {
            credential: Observable::new(initial),
            storage,
        }
    }

    /// Synchronous read of the latest credential.
    pub fn current_token(&self) -> Option<Credential> {
        self.credential.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    /// Persists `credential` and publishes it to subscribers.
    ///
    /// A storage failure keeps the in-memory session; it only means the
    /// credential will not survive a restart.
    pub fn establish(&self, credential: Credential) {
        if let Err(e) = self.storage.save(&credential) {
            tracing::warn!("[SessionStore] Failed to persist credential: {}", e);
        }
        self.credential.set(Some(credential));
    }

    /// Clears persisted and in-memory credential. Idempotent.
    pub fn clear(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!("[SessionStore] Failed to clear persisted credential: {}", e);
        }
        self.credential.set(None);
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Option<Credential>) + Send + Sync + 'static,
    {
        self.credential.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.credential.unsubscribe(id)
    }
}
