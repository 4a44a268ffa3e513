//! Observable values and listener registries
//!
//! Listeners are plain callbacks invoked synchronously on the thread that
//! publishes a change. The registry lock is never held while a callback runs,
//! so callbacks may subscribe, unsubscribe, or read state freely.
//!
//! A listener that is unsubscribed while a dispatch is in flight is skipped if
//! it has not been invoked yet.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Entry<T> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback<T>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: Arc::clone(&self.active),
            callback: Arc::clone(&self.callback),
        }
    }
}

struct Registry<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry<T>>>,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: 'static> Detach for Registry<T> {
    fn detach(&self, id: u64) {
        self.entries.lock().retain(|entry| entry.id != id);
    }
}

/// Set of listeners for values of type `T`
pub struct ListenerSet<T> {
    registry: Arc<Registry<T>>,
}

impl<T: 'static> ListenerSet<T> {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a listener
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));

        self.registry.entries.lock().push(Entry {
            id,
            active: Arc::clone(&active),
            callback: Arc::new(listener),
        });

        let registry: Arc<dyn Detach> = self.registry.clone();
        Subscription { id, active, registry: Arc::downgrade(&registry) }
    }

    /// Invoke every registered listener with `value`
    ///
    /// Returns the number of listeners invoked.
    pub fn notify(&self, value: &T) -> usize {
        let entries: Vec<Entry<T>> = self.registry.entries.lock().clone();

        let mut delivered = 0;
        for entry in entries {
            if entry.active.load(Ordering::Acquire) {
                (entry.callback)(value);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.registry.entries.lock().len()
    }

    /// Whether no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener (outstanding subscriptions become inert)
    pub fn clear(&self) {
        let drained: Vec<Entry<T>> = std::mem::take(&mut *self.registry.entries.lock());
        for entry in drained {
            entry.active.store(false, Ordering::Release);
        }
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered listener
///
/// Dropping the handle unsubscribes the listener.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Unsubscribe the listener
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// A value that notifies listeners when it changes
pub struct Observable<T> {
    value: RwLock<T>,
    listeners: ListenerSet<T>,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Create an observable holding `initial`
    pub fn new(initial: T) -> Self {
        Self { value: RwLock::new(initial), listeners: ListenerSet::new() }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Replace the value, notifying listeners if it changed
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.listeners.notify(&value);
        true
    }

    /// Listen for changes
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
