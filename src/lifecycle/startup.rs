//! Startup orchestration.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::loader::load_config;
use crate::config::schema::Settings;
use crate::config::ConfigError;
use crate::lifecycle::Shutdown;
use crate::proxy::{forward, AppState, SharedRouting};
use crate::reload::{run_coordinator, ConfigReloader};

/// Error type for startup failures. All of them are fatal: a process that
/// cannot read its configuration must not begin serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load initial configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Handles of the long-running tasks; the process exits when both join.
pub struct App {
    pub reloader: JoinHandle<()>,
    pub coordinator: JoinHandle<()>,
}

impl App {
    /// Join barrier over every long-running task. The coordinator drains
    /// all listener tasks before it returns, so this awaits those too.
    pub async fn join(self) {
        let _ = tokio::join!(self.reloader, self.coordinator);
    }
}

/// Wire up shared state and spawn the reload and coordinator tasks.
///
/// The first reload cycle runs immediately, publishing the initial table
/// and starting the listener. Fails fast when the configuration file
/// cannot be loaded at all.
pub fn launch(settings: Settings, shutdown: &Shutdown) -> Result<App, StartupError> {
    let initial = load_config(&settings.config_path)?;
    tracing::info!(
        servers = initial.servers.len(),
        routes = initial.routes.len(),
        "initial configuration loaded"
    );

    let state = AppState {
        shared: Arc::new(SharedRouting::new()),
        client: forward::client(),
        settings: settings.clone(),
    };

    let (publish_tx, publish_rx) = mpsc::unbounded_channel();

    let reloader = ConfigReloader::new(settings, publish_tx);
    let reloader_handle = tokio::spawn(reloader.run(shutdown.subscribe()));

    let coordinator_handle = tokio::spawn(run_coordinator(
        publish_rx,
        state,
        shutdown.clone(),
    ));

    Ok(App {
        reloader: reloader_handle,
        coordinator: coordinator_handle,
    })
}
