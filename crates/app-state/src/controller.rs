//! Theme controller
//!
//! Owns the theme state (`mode` plus last observed system scheme), keeps it in
//! sync with the [`SystemAppearance`] signal, persists the preference through a
//! [`ThemePreferenceStore`], and publishes a [`ThemeSnapshot`] whenever the
//! mode or the resolved scheme changes.
//!
//! Construction is two-phase: [`ThemeController::new`] starts synchronously at
//! [`ThemeMode::System`], and [`ThemeController::hydrate`] later applies the
//! persisted mode.
//!
//! # Example
//!
//! ```no_run
//! use app_platform::SystemAppearance;
//! use app_state::ThemeController;
//! use storage::{MemoryStorage, ThemeMode, ThemePreferenceStore};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let store = ThemePreferenceStore::new(Arc::new(MemoryStorage::new()));
//! let controller = ThemeController::new(store, Arc::new(SystemAppearance::default()));
//! controller.hydrate().await;
//!
//! let _sub = controller.subscribe(|snapshot| {
//!     println!("now rendering {}", snapshot.resolved);
//! });
//! controller.set_mode(ThemeMode::Dark).await;
//! # }
//! ```

use app_platform::{Subscription, SystemAppearance, SystemScheme};
use app_ui::{ColorScheme, Palette};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::{Arc, Weak};
use storage::{KeyValueStorage, ThemeMode, ThemePreferenceStore};
use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::broadcast::ChangeBroadcaster;
use crate::config::ThemeConfig;
use crate::resolver::ThemeSnapshot;

#[derive(Debug)]
struct ThemeState {
    mode: ThemeMode,
    system_scheme: SystemScheme,
    version: u64,
    hydrated: bool,
    user_set: bool,
}

impl ThemeState {
    fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot::new(self.mode, self.system_scheme, self.version)
    }
}

/// Theme preference and resolution state
pub struct ThemeController {
    state: Mutex<ThemeState>,
    broadcaster: ChangeBroadcaster,
    store: ThemePreferenceStore,
    appearance: Arc<SystemAppearance>,
    write_lock: AsyncMutex<()>,
    system_subscription: Mutex<Option<Subscription>>,
}

impl ThemeController {
    /// Create a controller in its initial (`system`, unhydrated) state
    ///
    /// The controller listens to `appearance` until [`shutdown`](Self::shutdown)
    /// is called or it is dropped.
    pub fn new(store: ThemePreferenceStore, appearance: Arc<SystemAppearance>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let subscription = appearance.subscribe(move |_: &SystemScheme| {
                if let Some(controller) = weak.upgrade() {
                    controller.sync_system_scheme();
                }
            });

            // Read after subscribing so no transition falls between the two.
            let system_scheme = appearance.current();
            let state = ThemeState {
                mode: ThemeMode::default(),
                system_scheme,
                version: 0,
                hydrated: false,
                user_set: false,
            };
            let initial = state.snapshot();

            Self {
                state: Mutex::new(state),
                broadcaster: ChangeBroadcaster::new(initial),
                store,
                appearance,
                write_lock: AsyncMutex::new(()),
                system_subscription: Mutex::new(Some(subscription)),
            }
        })
    }

    /// Create a controller over a storage backend using `config`
    pub fn with_config(
        backend: Arc<dyn KeyValueStorage>,
        config: &ThemeConfig,
        appearance: Arc<SystemAppearance>,
    ) -> Arc<Self> {
        let store = ThemePreferenceStore::with_key(backend, config.storage_key.clone());
        Self::new(store, appearance)
    }

    /// Current theme snapshot
    pub fn snapshot(&self) -> ThemeSnapshot {
        self.state.lock().snapshot()
    }

    /// Current preference
    pub fn mode(&self) -> ThemeMode {
        self.state.lock().mode
    }

    /// Current resolved scheme
    pub fn resolved(&self) -> ColorScheme {
        self.snapshot().resolved
    }

    /// Whether the persisted preference has been applied
    pub fn is_hydrated(&self) -> bool {
        self.state.lock().hydrated
    }

    /// System appearance signal this controller follows
    pub fn appearance(&self) -> &Arc<SystemAppearance> {
        &self.appearance
    }

    /// Preference store this controller persists into
    pub fn store(&self) -> &ThemePreferenceStore {
        &self.store
    }

    /// Listen for theme changes
    ///
    /// The listener runs synchronously on the thread that caused the change.
    /// Keep the returned [`Subscription`] alive while the consumer is mounted.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ThemeSnapshot) + Send + Sync + 'static,
    {
        self.broadcaster.subscribe(listener)
    }

    /// Async receiver of published snapshots
    pub fn watch(&self) -> watch::Receiver<ThemeSnapshot> {
        self.broadcaster.watch()
    }

    /// Change the preference
    ///
    /// State is updated and subscribers are notified before this returns. The
    /// returned future persists the mode current when the write runs and
    /// resolves to whether the write landed; persistence failures are logged,
    /// never surfaced. Setting the current mode again skips notification but
    /// still writes.
    pub fn set_mode(&self, mode: ThemeMode) -> impl Future<Output = bool> + Send + '_ {
        let published = self.apply(|state| {
            state.mode = mode;
            state.user_set = true;
        });
        if let Some(snapshot) = published {
            tracing::debug!(mode = %mode, resolved = %snapshot.resolved, "theme mode changed");
        }
        self.persist()
    }

    /// Return to following the system scheme
    pub fn reset(&self) -> impl Future<Output = bool> + Send + '_ {
        self.set_mode(ThemeMode::System)
    }

    /// Load the persisted preference and apply it
    ///
    /// A mode set by the user before the load completes is kept. Returns the
    /// mode in effect afterwards.
    pub async fn hydrate(&self) -> ThemeMode {
        let loaded = self.store.load().await;

        let mut superseded = false;
        self.apply(|state| {
            state.hydrated = true;
            if state.user_set {
                superseded = true;
            } else {
                state.mode = loaded;
            }
        });

        if superseded {
            tracing::debug!(loaded = %loaded, "persisted theme ignored, mode already chosen");
        } else {
            tracing::info!(mode = %loaded, "theme preference hydrated");
        }
        self.mode()
    }

    /// View-facing handle over the current snapshot
    pub fn use_theme(self: &Arc<Self>) -> ThemeHandle {
        ThemeHandle::new(Arc::clone(self), self.snapshot())
    }

    /// Detach from the system appearance signal and drop every subscriber
    pub fn shutdown(&self) {
        let subscription = self.system_subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!("theme controller detached from system appearance");
        }
        self.broadcaster.clear();
    }

    /// Adopt the signal's current value
    ///
    /// Notifications from concurrent updates can arrive out of order, so the
    /// value is re-read under the state lock instead of taken from the event.
    fn sync_system_scheme(&self) {
        let published = self.apply(|state| state.system_scheme = self.appearance.current());
        match published {
            Some(snapshot) => {
                tracing::debug!(
                    system = %snapshot.system_scheme,
                    resolved = %snapshot.resolved,
                    "resolved theme followed system"
                );
            }
            None => tracing::trace!("system scheme recorded"),
        }
    }

    /// Mutate state and publish if the change is observable
    ///
    /// The state lock is released before listeners run.
    fn apply<F>(&self, mutate: F) -> Option<ThemeSnapshot>
    where
        F: FnOnce(&mut ThemeState),
    {
        let snapshot = {
            let mut state = self.state.lock();
            let before = state.snapshot();
            mutate(&mut state);
            if state.mode == before.mode && state.system_scheme == before.system_scheme {
                return None;
            }
            state.version += 1;
            let after = state.snapshot();
            if after.presents_like(&before) {
                return None;
            }
            after
        };

        self.broadcaster.publish(&snapshot);
        Some(snapshot)
    }

    async fn persist(&self) -> bool {
        let _write = self.write_lock.lock().await;
        let mode = self.state.lock().mode;
        self.store.save(mode).await
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("state", &*self.state.lock())
            .field("broadcaster", &self.broadcaster)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// What a view reads to render itself
///
/// Fields are captured when the handle is created; call
/// [`ThemeHandle::refresh`] (typically from a subscription) for newer values.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    /// Resolved scheme
    pub color_scheme: ColorScheme,
    /// User preference
    pub theme_mode: ThemeMode,
    /// Whether the resolved scheme is dark
    pub is_dark: bool,
    /// Last observed system scheme
    pub system_color_scheme: SystemScheme,
    /// Palette for the resolved scheme
    pub palette: &'static Palette,
    controller: Arc<ThemeController>,
}

impl ThemeHandle {
    fn new(controller: Arc<ThemeController>, snapshot: ThemeSnapshot) -> Self {
        Self {
            color_scheme: snapshot.resolved,
            theme_mode: snapshot.mode,
            is_dark: snapshot.is_dark,
            system_color_scheme: snapshot.system_scheme,
            palette: snapshot.palette,
            controller,
        }
    }

    /// Change the preference (see [`ThemeController::set_mode`])
    pub fn set_theme_mode(&self, mode: ThemeMode) -> impl Future<Output = bool> + Send + '_ {
        self.controller.set_mode(mode)
    }

    /// Return to following the system scheme
    pub fn reset_theme(&self) -> impl Future<Output = bool> + Send + '_ {
        self.controller.reset()
    }

    /// A handle over the controller's current snapshot
    pub fn refresh(&self) -> ThemeHandle {
        self.controller.use_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_ui::{DARK, LIGHT};
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::kv::Result as KvResult;
    use storage::{KvError, MemoryStorage, THEME_STORAGE_KEY};

    mock! {
        Backend {}

        #[async_trait]
        impl KeyValueStorage for Backend {
            async fn get_item(&self, key: &str) -> KvResult<Option<String>>;
            async fn set_item(&self, key: &str, value: &str) -> KvResult<()>;
            async fn remove_item(&self, key: &str) -> KvResult<()>;
        }
    }

    struct Harness {
        backend: MemoryStorage,
        appearance: Arc<SystemAppearance>,
        controller: Arc<ThemeController>,
    }

    fn harness(system: SystemScheme) -> Harness {
        harness_with(MemoryStorage::new(), system)
    }

    fn harness_with(backend: MemoryStorage, system: SystemScheme) -> Harness {
        let appearance = Arc::new(SystemAppearance::new(system));
        let store = ThemePreferenceStore::new(Arc::new(backend.clone()));
        let controller = ThemeController::new(store, appearance.clone());
        Harness { backend, appearance, controller }
    }

    fn record(controller: &ThemeController) -> (Arc<Mutex<Vec<ThemeSnapshot>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = controller.subscribe(move |snapshot| s.lock().push(*snapshot));
        (seen, sub)
    }

    async fn stored(backend: &MemoryStorage) -> Option<String> {
        backend.raw(THEME_STORAGE_KEY).await
    }

    #[tokio::test]
    async fn test_initial_state_is_system() {
        let h = harness(SystemScheme::Dark);
        let snapshot = h.controller.snapshot();

        assert_eq!(snapshot.mode, ThemeMode::System);
        assert_eq!(snapshot.system_scheme, SystemScheme::Dark);
        assert_eq!(snapshot.resolved, ColorScheme::Dark);
        assert!(!h.controller.is_hydrated());
    }

    #[tokio::test]
    async fn test_fresh_install_follows_system() {
        // Nothing stored, OS dark: system mode, dark palette.
        let h = harness(SystemScheme::Dark);

        assert_eq!(h.controller.hydrate().await, ThemeMode::System);

        let snapshot = h.controller.snapshot();
        assert!(h.controller.is_hydrated());
        assert!(snapshot.is_dark);
        assert_eq!(snapshot.palette, &DARK);
    }

    #[tokio::test]
    async fn test_explicit_dark_is_persisted() {
        let h = harness(SystemScheme::Light);
        h.controller.hydrate().await;

        assert!(h.controller.set_mode(ThemeMode::Dark).await);

        assert_eq!(stored(&h.backend).await.as_deref(), Some(r#"{"themeMode":"dark"}"#));
        assert_eq!(h.controller.resolved(), ColorScheme::Dark);
    }

    #[tokio::test]
    async fn test_persisted_mode_survives_restart() {
        let backend = MemoryStorage::with_item(THEME_STORAGE_KEY, r#"{"themeMode":"dark"}"#);
        let h = harness_with(backend, SystemScheme::Light);

        assert_eq!(h.controller.hydrate().await, ThemeMode::Dark);
        assert_eq!(h.controller.resolved(), ColorScheme::Dark);
    }

    #[tokio::test]
    async fn test_legacy_envelope_is_hydrated() {
        let backend = MemoryStorage::with_item(
            THEME_STORAGE_KEY,
            r#"{"state":{"themeMode":"light"},"version":0}"#,
        );
        let h = harness_with(backend, SystemScheme::Dark);

        assert_eq!(h.controller.hydrate().await, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_corrupt_record_defaults_to_system() {
        let backend = MemoryStorage::with_item(THEME_STORAGE_KEY, "{not json");
        let h = harness_with(backend, SystemScheme::Dark);

        assert_eq!(h.controller.hydrate().await, ThemeMode::System);
        assert_eq!(h.controller.resolved(), ColorScheme::Dark);
    }

    #[tokio::test]
    async fn test_hydration_notifies_when_resolved_changes() {
        let backend = MemoryStorage::with_item(THEME_STORAGE_KEY, r#"{"themeMode":"dark"}"#);
        let h = harness_with(backend, SystemScheme::Light);
        let (seen, _sub) = record(&h.controller);

        h.controller.hydrate().await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mode, ThemeMode::Dark);
        assert!(seen[0].is_dark);
    }

    #[tokio::test]
    async fn test_hydration_without_change_is_silent() {
        let h = harness(SystemScheme::Light);
        let (seen, _sub) = record(&h.controller);

        h.controller.hydrate().await;

        assert!(seen.lock().is_empty());
        assert!(h.controller.is_hydrated());
    }

    #[tokio::test]
    async fn test_user_choice_before_hydration_wins() {
        let backend = MemoryStorage::with_item(THEME_STORAGE_KEY, r#"{"themeMode":"light"}"#);
        let h = harness_with(backend, SystemScheme::Light);

        h.controller.set_mode(ThemeMode::Dark).await;
        assert_eq!(h.controller.hydrate().await, ThemeMode::Dark);

        assert_eq!(h.controller.mode(), ThemeMode::Dark);
        assert_eq!(stored(&h.backend).await.as_deref(), Some(r#"{"themeMode":"dark"}"#));
    }

    #[tokio::test]
    async fn test_set_mode_notifies_before_persisting() {
        let h = harness(SystemScheme::Light);
        let (seen, _sub) = record(&h.controller);

        let pending = h.controller.set_mode(ThemeMode::Dark);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(h.controller.mode(), ThemeMode::Dark);
        assert!(stored(&h.backend).await.is_none());

        assert!(pending.await);
        assert!(stored(&h.backend).await.is_some());
    }

    #[tokio::test]
    async fn test_set_same_mode_is_idempotent() {
        let h = harness(SystemScheme::Light);
        let (seen, _sub) = record(&h.controller);

        h.controller.set_mode(ThemeMode::Dark).await;
        let once = h.controller.snapshot();
        h.controller.set_mode(ThemeMode::Dark).await;
        let twice = h.controller.snapshot();

        assert_eq!(seen.lock().len(), 1);
        assert!(once.presents_like(&twice));
        assert_eq!(stored(&h.backend).await.as_deref(), Some(r#"{"themeMode":"dark"}"#));
    }

    #[tokio::test]
    async fn test_repeated_set_writes_every_time() {
        let writes = Arc::new(AtomicUsize::new(0));
        let mut backend = MockBackend::new();
        let w = writes.clone();
        backend.expect_set_item().returning(move |_, _| {
            w.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let store = ThemePreferenceStore::new(Arc::new(backend));
        let controller = ThemeController::new(store, Arc::new(SystemAppearance::default()));

        controller.set_mode(ThemeMode::Light).await;
        controller.set_mode(ThemeMode::Light).await;

        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_matches_set_system() {
        let a = harness(SystemScheme::Dark);
        let b = harness(SystemScheme::Dark);

        a.controller.set_mode(ThemeMode::Light).await;
        b.controller.set_mode(ThemeMode::Light).await;

        a.controller.reset().await;
        b.controller.set_mode(ThemeMode::System).await;

        let (sa, sb) = (a.controller.snapshot(), b.controller.snapshot());
        assert!(sa.presents_like(&sb));
        assert_eq!(sa.resolved, ColorScheme::Dark);
        assert_eq!(stored(&a.backend).await, stored(&b.backend).await);
        assert_eq!(stored(&a.backend).await.as_deref(), Some(r#"{"themeMode":"system"}"#));
    }

    #[tokio::test]
    async fn test_os_toggle_while_following_system() {
        let h = harness(SystemScheme::Light);
        h.controller.hydrate().await;
        let (seen, _sub) = record(&h.controller);

        h.appearance.update(SystemScheme::Dark);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].resolved, ColorScheme::Dark);
        assert_eq!(seen[0].palette.background, "#151718");
    }

    #[tokio::test]
    async fn test_os_toggle_under_fixed_mode_is_silent() {
        let h = harness(SystemScheme::Dark);
        h.controller.set_mode(ThemeMode::Light).await;
        let (seen, _sub) = record(&h.controller);

        h.appearance.update(SystemScheme::Light);
        h.appearance.update(SystemScheme::Dark);

        assert!(seen.lock().is_empty());
        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.resolved, ColorScheme::Light);
        assert_eq!(snapshot.system_scheme, SystemScheme::Dark);
    }

    #[tokio::test]
    async fn test_unknown_system_resolves_light() {
        let h = harness(SystemScheme::Dark);
        let (seen, _sub) = record(&h.controller);

        h.appearance.update(SystemScheme::Unknown);

        assert_eq!(h.controller.resolved(), ColorScheme::Light);
        assert_eq!(seen.lock()[0].palette, &LIGHT);
    }

    #[tokio::test]
    async fn test_rapid_toggling_persists_last_choice() {
        let h = harness(SystemScheme::Light);
        let (seen, _sub) = record(&h.controller);

        let first = h.controller.set_mode(ThemeMode::Light);
        let second = h.controller.set_mode(ThemeMode::Dark);
        let third = h.controller.set_mode(ThemeMode::System);
        tokio::join!(first, second, third);

        assert_eq!(h.controller.mode(), ThemeMode::System);
        assert_eq!(stored(&h.backend).await.as_deref(), Some(r#"{"themeMode":"system"}"#));

        // light → dark → system (light): each step changed the mode.
        let versions: Vec<u64> = seen.lock().iter().map(|s| s.version).collect();
        assert_eq!(versions.len(), 3);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.lock().last().map(|s| s.mode), Some(ThemeMode::System));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_mode() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut backend = MockBackend::new();
        let a = attempts.clone();
        backend.expect_set_item().returning(move |_, _| {
            if a.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(KvError::Unavailable("quota exceeded".to_string()))
            } else {
                Ok(())
            }
        });

        let store = ThemePreferenceStore::new(Arc::new(backend));
        let controller = ThemeController::new(store, Arc::new(SystemAppearance::default()));
        let (seen, _sub) = record(&controller);

        assert!(!controller.set_mode(ThemeMode::Dark).await);
        assert_eq!(controller.mode(), ThemeMode::Dark);
        assert_eq!(seen.lock().len(), 1);

        assert!(controller.set_mode(ThemeMode::Dark).await);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_read_failure_hydrates_to_system() {
        let mut backend = MockBackend::new();
        backend
            .expect_get_item()
            .times(1)
            .returning(|_| Err(KvError::Unavailable("storage not ready".to_string())));

        let store = ThemePreferenceStore::new(Arc::new(backend));
        let appearance = Arc::new(SystemAppearance::new(SystemScheme::Dark));
        let controller = ThemeController::new(store, appearance);

        assert_eq!(controller.hydrate().await, ThemeMode::System);
        assert!(controller.snapshot().is_dark);
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_is_not_called() {
        let h = harness(SystemScheme::Light);
        let (seen, sub) = record(&h.controller);

        sub.unsubscribe();
        h.controller.set_mode(ThemeMode::Dark).await;

        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_listener_reads_consistent_state() {
        let h = harness(SystemScheme::Light);
        let controller = h.controller.clone();
        let consistent = Arc::new(Mutex::new(Vec::new()));

        let c = consistent.clone();
        let weak = Arc::downgrade(&controller);
        let _sub = controller.subscribe(move |snapshot| {
            if let Some(controller) = weak.upgrade() {
                c.lock().push(controller.snapshot().resolved == snapshot.resolved);
            }
        });

        controller.set_mode(ThemeMode::Dark).await;
        h.appearance.update(SystemScheme::Dark);
        controller.set_mode(ThemeMode::System).await;

        // The fixed-mode system change is silent; the other two publish.
        assert_eq!(*consistent.lock(), vec![true, true]);
    }

    #[tokio::test]
    async fn test_watch_tracks_published_snapshots() {
        let h = harness(SystemScheme::Light);
        let mut rx = h.controller.watch();

        h.controller.set_mode(ThemeMode::Dark).await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().mode, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_shutdown_releases_system_listener() {
        let h = harness(SystemScheme::Light);
        let (seen, sub) = record(&h.controller);
        assert_eq!(h.appearance.listener_count(), 1);

        h.controller.shutdown();

        assert_eq!(h.appearance.listener_count(), 0);
        assert!(!sub.is_active());
        h.appearance.update(SystemScheme::Dark);
        assert!(seen.lock().is_empty());
        assert_eq!(h.controller.snapshot().system_scheme, SystemScheme::Light);
    }

    #[tokio::test]
    async fn test_drop_releases_system_listener() {
        let h = harness(SystemScheme::Light);
        let Harness { appearance, controller, .. } = h;

        drop(controller);

        assert_eq!(appearance.listener_count(), 0);
        appearance.update(SystemScheme::Dark);
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let backend = MemoryStorage::new();
        let config = ThemeConfig::new().storage_key("alt-theme");
        let appearance = Arc::new(SystemAppearance::default());
        let controller =
            ThemeController::with_config(Arc::new(backend.clone()), &config, appearance);

        controller.set_mode(ThemeMode::Light).await;

        assert_eq!(controller.store().key(), "alt-theme");
        assert!(backend.raw("alt-theme").await.is_some());
        assert!(stored(&backend).await.is_none());
    }

    #[tokio::test]
    async fn test_use_theme_handle() {
        let h = harness(SystemScheme::Dark);
        let theme = h.controller.use_theme();

        assert_eq!(theme.theme_mode, ThemeMode::System);
        assert_eq!(theme.system_color_scheme, SystemScheme::Dark);
        assert_eq!(theme.color_scheme, ColorScheme::Dark);
        assert!(theme.is_dark);
        assert_eq!(theme.palette.tab_icon_selected, "#fff");

        theme.set_theme_mode(ThemeMode::Light).await;
        let theme = theme.refresh();
        assert_eq!(theme.color_scheme, ColorScheme::Light);
        assert_eq!(theme.palette.tint, "#0a7ea4");

        theme.reset_theme().await;
        assert_eq!(theme.refresh().theme_mode, ThemeMode::System);
    }

    #[tokio::test]
    async fn test_unsubscribe_during_dispatch_skips_pending_listener() {
        let h = harness(SystemScheme::Light);
        let victim_calls = Arc::new(AtomicUsize::new(0));
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        // Registered first, so it runs before the victim.
        let slot = victim.clone();
        let killer_calls = Arc::new(AtomicUsize::new(0));
        let k = killer_calls.clone();
        let _killer = h.controller.subscribe(move |_| {
            k.fetch_add(1, Ordering::SeqCst);
            slot.lock().take();
        });

        let c = victim_calls.clone();
        *victim.lock() = Some(h.controller.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        h.controller.set_mode(ThemeMode::Dark).await;
        h.controller.set_mode(ThemeMode::Light).await;

        assert_eq!(killer_calls.load(Ordering::SeqCst), 2);
        assert_eq!(victim_calls.load(Ordering::SeqCst), 0);
        assert!(victim.lock().is_none());
    }

    #[test]
    fn test_concurrent_system_updates_settle_on_latest() {
        use std::sync::Barrier;
        use std::thread;

        let appearance = Arc::new(SystemAppearance::new(SystemScheme::Light));
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));

        // A slow host listener, registered ahead of the controller, stalls the
        // dispatch of `Dark` until a later `Light` update has been delivered.
        let (e, r) = (entered.clone(), release.clone());
        let _host = appearance.subscribe(move |scheme| {
            if *scheme == SystemScheme::Dark {
                e.wait();
                r.wait();
            }
        });

        let store = ThemePreferenceStore::new(Arc::new(MemoryStorage::new()));
        let controller = ThemeController::new(store, appearance.clone());

        let writer = appearance.clone();
        let stalled = thread::spawn(move || writer.update(SystemScheme::Dark));

        entered.wait();
        appearance.update(SystemScheme::Light);
        release.wait();
        stalled.join().unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(appearance.current(), SystemScheme::Light);
        assert_eq!(snapshot.system_scheme, appearance.current());
        assert_eq!(snapshot.resolved, ColorScheme::Light);
    }
}
