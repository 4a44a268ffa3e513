//! Theme change broadcasting
//!
//! Fans [`ThemeSnapshot`]s out to synchronous listeners and to a `watch`
//! channel for async consumers. Each subscriber tracks the last version it was
//! handed, so a snapshot older than one already delivered is dropped instead of
//! overwriting newer state.

use app_platform::{ListenerSet, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::resolver::ThemeSnapshot;

/// Snapshot fan-out with per-subscriber ordering
pub struct ChangeBroadcaster {
    listeners: ListenerSet<ThemeSnapshot>,
    latest: watch::Sender<ThemeSnapshot>,
}

impl ChangeBroadcaster {
    /// Create a broadcaster whose watch channel starts at `initial`
    pub fn new(initial: ThemeSnapshot) -> Self {
        let (latest, _) = watch::channel(initial);
        Self { listeners: ListenerSet::new(), latest }
    }

    /// Register a listener
    ///
    /// Only snapshots published after registration are delivered, each at most
    /// once and never out of version order.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ThemeSnapshot) + Send + Sync + 'static,
    {
        let delivered = AtomicU64::new(self.latest.borrow().version);
        self.listeners.subscribe(move |snapshot: &ThemeSnapshot| {
            if delivered.fetch_max(snapshot.version, Ordering::AcqRel) < snapshot.version {
                listener(snapshot);
            }
        })
    }

    /// Async receiver holding the most recently published snapshot
    pub fn watch(&self) -> watch::Receiver<ThemeSnapshot> {
        self.latest.subscribe()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> ThemeSnapshot {
        *self.latest.borrow()
    }

    /// Publish a snapshot to every subscriber
    ///
    /// Returns the number of listeners reached.
    pub fn publish(&self, snapshot: &ThemeSnapshot) -> usize {
        self.latest.send_if_modified(|current| {
            if snapshot.version > current.version {
                *current = *snapshot;
                true
            } else {
                false
            }
        });
        self.listeners.notify(snapshot)
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.listeners.clear();
    }
}

impl std::fmt::Debug for ChangeBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBroadcaster")
            .field("subscribers", &self.subscriber_count())
            .field("latest_version", &self.latest.borrow().version)
            .finish()
    }
}
