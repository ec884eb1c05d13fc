//! Observer registry used by every push-style notification in the engine.
//!
//! Callbacks are stored in subscription order and removed through the
//! [`Subscription`] handle returned by [`ObserverRegistry::subscribe`].
//! Dispatch works on a snapshot of the registered callbacks and re-checks each
//! entry's active flag right before invoking it, so a callback that is
//! unsubscribed while a dispatch is in progress (including from inside another
//! callback) is never called afterwards.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Callback type stored by the registry.
pub type ObserverCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ObserverEntry<T> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: ObserverCallback<T>,
}

impl<T> Clone for ObserverEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

struct RegistryInner<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<ObserverEntry<T>>>,
}

impl<T> RegistryInner<T> {
    fn remove(&self, id: u64) {
        self.entries.lock().retain(|entry| entry.id != id);
    }
}

/// Ordered set of callbacks with handle-based removal.
///
/// Cloning the registry yields another handle to the same set of observers.
pub struct ObserverRegistry<T> {
    inner: Arc<RegistryInner<T>>,
}

impl<T> Clone for ObserverRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                next_id: AtomicU64::new(1),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a callback. It stays registered until the returned handle is
    /// unsubscribed or the registry is cleared.
    #[must_use = "dropping the handle leaves the callback registered with no way to remove it"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));

        self.inner.entries.lock().push(ObserverEntry {
            id,
            active: active.clone(),
            callback: Arc::new(callback),
        });

        let weak: Weak<RegistryInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            active,
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id);
                }
            })),
        }
    }

    /// Invoke every active callback in subscription order.
    ///
    /// Must not be called while holding a lock that a callback may need.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<ObserverEntry<T>> = self.inner.entries.lock().clone();
        for entry in snapshot {
            if entry.active.load(Ordering::Acquire) {
                (entry.callback)(value);
            }
        }
    }

    /// Deactivate and drop every registered callback.
    pub fn clear(&self) {
        let drained: Vec<ObserverEntry<T>> = std::mem::take(&mut *self.inner.entries.lock());
        for entry in drained {
            entry.active.store(false, Ordering::Release);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`ObserverRegistry::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    active: Arc<AtomicBool>,
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the callback. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
