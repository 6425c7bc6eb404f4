//! Listener lifecycle supervision.

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::proxy::{build_router, AppState};

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

struct ActiveListener {
    port: String,
    retire_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the network listener lifecycle.
///
/// Starts a listener for the configured port, retires the previous one
/// when the port changes, and keeps every spawned task's handle so the
/// process can await clean shutdown.
pub struct ListenerSupervisor {
    shutdown: Shutdown,
    active: Option<ActiveListener>,
    draining: Vec<JoinHandle<()>>,
}

impl ListenerSupervisor {
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            shutdown,
            active: None,
            draining: Vec::new(),
        }
    }

    /// Port of the currently active listener, if any.
    pub fn active_port(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.port.as_str())
    }

    /// Make sure a listener is serving on `port`.
    ///
    /// Idempotent for an unchanged port. On a port change the old listener
    /// is retired first: it stops accepting immediately and drains its
    /// in-flight requests in the background.
    pub async fn ensure_listening(
        &mut self,
        state: AppState,
        port: &str,
    ) -> Result<(), ListenerError> {
        if let Some(active) = &self.active {
            if active.port == port {
                return Ok(());
            }
        }

        if let Some(old) = self.active.take() {
            tracing::info!(
                old_port = %old.port,
                new_port = %port,
                "listen port changed, retiring old listener"
            );
            let _ = old.retire_tx.send(true);
            self.draining.push(old.handle);
        }

        let address = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ListenerError::Bind {
                address: address.clone(),
                source,
            })?;
        tracing::info!(address = %address, "listener bound");

        let (retire_tx, mut retire_rx) = watch::channel(false);
        let mut global_shutdown = self.shutdown.subscribe();
        let app = build_router(state);
        let task_port = port.to_string();

        let handle = tokio::spawn(async move {
            let drain = async move {
                tokio::select! {
                    _ = global_shutdown.recv() => {
                        tracing::info!(port = %task_port, "listener draining for shutdown");
                    }
                    _ = retire_rx.changed() => {
                        tracing::info!(port = %task_port, "listener retired after port change");
                    }
                }
            };

            if let Err(error) = axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(drain)
                .await
            {
                tracing::error!(error = %error, "listener task failed");
            }
        });

        self.active = Some(ActiveListener {
            port: port.to_string(),
            retire_tx,
            handle,
        });
        Ok(())
    }

    /// Retire the active listener and wait for every listener task,
    /// including ones still draining from earlier port changes.
    pub async fn shutdown(mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.retire_tx.send(true);
            self.draining.push(active.handle);
        }
        for handle in self.draining {
            let _ = handle.await;
        }
        tracing::info!("all listener tasks finished");
    }
}
