//! A held value plus synchronously notified listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

/// Single mutable value with change notification.
///
/// Listeners run on the caller's thread inside [`set`](Self::set), after the
/// value lock is released, so a listener may read the observable again
/// without deadlocking. Setting a value equal to the current one notifies
/// nobody.
///
/// Concurrent `set` calls are serialized through their notifications, so
/// listeners see changes in commit order and the last notification carries
/// the current value. A listener must not call `set` on the same observable.
pub struct Observable<T> {
    inner: Mutex<Inner<T>>,
    notify: Mutex<()>,
    next_id: AtomicU64,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value,
                listeners: Vec::new(),
            }),
            notify: Mutex::new(()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Replaces the value and notifies listeners if it changed.
    ///
    /// Returns `true` when listeners were notified.
    pub fn set(&self, value: T) -> bool {
        let _notifying = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        let listeners: Vec<Listener<T>> = {
            let mut inner = self.lock();
            if inner.value == value {
                return false;
            }
            inner.value = value.clone();
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Registers a listener invoked with every new value.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().listeners.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panicking listener never runs under the lock, so the data is intact.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
