//! Application bootstrap
//!
//! Startup is two-phase: [`App::bootstrap`] returns as soon as the theme
//! controller exists (at its `system` default), while the persisted preference
//! loads in the background. [`App::ready`] waits for that load.

use anyhow::{Context, Result};
use app_platform::{SystemAppearance, SystemScheme};
use app_state::ThemeController;
use std::sync::Arc;
use storage::{KeyValueStorage, KvStore, ThemeMode};
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::logging::init_logging;

/// A running app shell
pub struct App {
    config: AppConfig,
    kv: Option<Arc<KvStore>>,
    controller: Arc<ThemeController>,
    hydration: Mutex<Option<JoinHandle<ThemeMode>>>,
}

impl App {
    /// Start the shell with its sled-backed store
    ///
    /// Installs logging, opens the store at `config.storage.path`, and spawns
    /// hydration of the theme preference.
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        init_logging(config.development.enable_debug_logs);

        let kv = KvStore::new(config.storage.clone())
            .with_context(|| format!("opening key-value store at {}", config.storage.path))?;
        let kv = Arc::new(kv);

        let appearance = if config.theme.detect_system_scheme {
            SystemAppearance::detect()
        } else {
            SystemAppearance::new(SystemScheme::Unknown)
        };

        let backend: Arc<dyn KeyValueStorage> = kv.clone();
        let mut app = Self::with_backend(config, backend, Arc::new(appearance))?;
        app.kv = Some(kv);
        Ok(app)
    }

    /// Start the shell over an existing backend and appearance signal
    ///
    /// Fails when called outside a tokio runtime, since hydration is spawned
    /// onto the current one.
    pub fn with_backend(
        config: AppConfig,
        backend: Arc<dyn KeyValueStorage>,
        appearance: Arc<SystemAppearance>,
    ) -> Result<Self> {
        let runtime = Handle::try_current().context("app shell requires a tokio runtime")?;
        let controller = ThemeController::with_config(backend, &config.theme, appearance);

        let hydrating = Arc::clone(&controller);
        let hydration = runtime.spawn(async move { hydrating.hydrate().await });

        tracing::info!(
            app = %config.app_name,
            version = %config.app_version,
            system = %controller.snapshot().system_scheme,
            "app shell started"
        );

        Ok(Self { config, kv: None, controller, hydration: Mutex::new(Some(hydration)) })
    }

    /// Configuration the shell was started with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Theme controller
    pub fn controller(&self) -> &Arc<ThemeController> {
        &self.controller
    }

    /// System appearance signal (the host bridge pushes OS changes here)
    pub fn appearance(&self) -> &Arc<SystemAppearance> {
        self.controller.appearance()
    }

    /// Wait for the persisted preference to be applied
    ///
    /// Returns the mode in effect. Later calls return immediately.
    pub async fn ready(&self) -> Result<ThemeMode> {
        let pending = self.hydration.lock().await.take();
        match pending {
            Some(handle) => handle.await.context("theme hydration task failed"),
            None => Ok(self.controller.mode()),
        }
    }

    /// Stop listening for system changes and flush the store
    pub async fn shutdown(&self) -> Result<()> {
        self.ready().await?;
        self.controller.shutdown();

        if let Some(kv) = &self.kv {
            kv.flush().await.context("flushing key-value store")?;
        }
        tracing::info!(app = %self.config.app_name, "app shell stopped");
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("app_name", &self.config.app_name)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
