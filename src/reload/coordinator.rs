//! The coordinator task between the reloader and the listener.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::lifecycle::Shutdown;
use crate::net::ListenerSupervisor;
use crate::proxy::AppState;
use crate::routing::RoutingTable;

/// Consume published routing tables in order: reconcile rotation counters,
/// swap the shared snapshot, and (re)start the listener when needed.
///
/// Runs until shutdown or until the reloader drops its end of the channel,
/// then drains every listener task.
pub async fn run_coordinator(
    mut updates: mpsc::UnboundedReceiver<Arc<RoutingTable>>,
    state: AppState,
    shutdown: Shutdown,
) {
    let mut supervisor = ListenerSupervisor::new(shutdown.clone());
    let mut shutdown_rx = shutdown.subscribe();
    let mut previous: Option<Arc<RoutingTable>> = None;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(table) = update else {
                    tracing::info!("routing table channel closed, coordinator exiting");
                    break;
                };

                // Counters first: a request racing the swap either keeps the
                // old table with its old counter or sees both renewed.
                state.shared.counters.sync(previous.as_deref(), &table);
                state.shared.table.store(table.clone());
                tracing::debug!(port = %table.listen_port, "routing table swapped in");

                if let Err(error) = supervisor
                    .ensure_listening(state.clone(), &table.listen_port)
                    .await
                {
                    tracing::error!(
                        error = %error,
                        port = %table.listen_port,
                        "failed to start listener for published table"
                    );
                }
                previous = Some(table);
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("coordinator received shutdown signal, exiting loop");
                break;
            }
        }
    }

    supervisor.shutdown().await;
}
