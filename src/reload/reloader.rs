//! The periodic reload and health-probe cycle.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::time;

use crate::config::loader::load_config;
use crate::config::schema::{Settings, SlbConfig};
use crate::health::{HealthRecord, Prober};
use crate::observability::metrics;
use crate::routing::RoutingTable;

/// Long-running task that re-reads configuration, probes backend health
/// and publishes a fresh [`RoutingTable`] whenever something changed.
pub struct ConfigReloader {
    settings: Settings,
    prober: Prober,
    publish_tx: mpsc::UnboundedSender<Arc<RoutingTable>>,
    last: Option<Arc<RoutingTable>>,
}

impl ConfigReloader {
    pub fn new(settings: Settings, publish_tx: mpsc::UnboundedSender<Arc<RoutingTable>>) -> Self {
        let prober = Prober::new(settings.probe_timeout);
        Self {
            settings,
            prober,
            publish_tx,
            last: None,
        }
    }

    /// Run until shutdown. The first cycle runs immediately, so the first
    /// table is published (and the listener started) without waiting a
    /// full interval.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = ?self.settings.reload_interval,
            config = ?self.settings.config_path,
            "config reloader starting"
        );

        let mut ticker = time::interval(self.settings.reload_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.cycle().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("config reloader received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One reload cycle: load → probe → compare → publish on change.
    async fn cycle(&mut self) {
        let config = match load_config(&self.settings.config_path) {
            Ok(config) => config.normalize(),
            Err(error) => {
                tracing::error!(
                    error = %error,
                    path = ?self.settings.config_path,
                    "config reload failed, keeping last applied table"
                );
                return;
            }
        };

        let table = self.probe_table(config).await;

        if let Some(last) = &self.last {
            self.log_transitions(last, &table);
        }
        if !should_republish(self.last.as_deref(), &table) {
            tracing::debug!("configuration and reachability unchanged, skipping republish");
            return;
        }

        let table = Arc::new(table);
        tracing::info!(
            port = %table.listen_port,
            servers = table.servers.len(),
            routes = table.routes.len(),
            mode = %table.mode,
            "publishing refreshed routing table"
        );
        metrics::record_reload();

        if self.publish_tx.send(table.clone()).is_err() {
            tracing::warn!("coordinator gone, dropping routing table update");
            return;
        }
        self.last = Some(table);
    }

    /// Probe every backend in every pool and assemble the table.
    ///
    /// Probes within one pool run concurrently; a failed probe only marks
    /// its own record, it never aborts the cycle.
    async fn probe_table(&self, config: SlbConfig) -> RoutingTable {
        let server_health = self.probe_pool(&config.servers).await;

        let mut route_health = Vec::with_capacity(config.routes.len());
        for route in &config.routes {
            route_health.push(self.probe_pool(&route.endpoints).await);
        }

        RoutingTable::assemble(config, server_health, route_health)
    }

    async fn probe_pool(&self, endpoints: &[String]) -> Vec<HealthRecord> {
        join_all(endpoints.iter().map(|endpoint| self.prober.probe(endpoint))).await
    }

    /// Log reachability transitions for pools whose endpoint lists are
    /// unchanged; position-wise comparison is meaningless otherwise.
    fn log_transitions(&self, last: &RoutingTable, next: &RoutingTable) {
        if last.servers == next.servers {
            log_pool_transitions(&next.servers, &last.server_health, &next.server_health);
        }
        for (index, route) in next.routes.iter().enumerate() {
            let Some(old_route) = last.routes.get(index) else {
                continue;
            };
            if old_route.endpoints == route.endpoints {
                if let (Some(old), Some(new)) =
                    (last.route_health.get(index), next.route_health.get(index))
                {
                    log_pool_transitions(&route.endpoints, old, new);
                }
            }
        }
    }
}

/// The republish policy: configuration-content changes always republish;
/// health changes republish only when reachability flipped somewhere.
/// Latency jitter alone never does.
fn should_republish(last: Option<&RoutingTable>, next: &RoutingTable) -> bool {
    match last {
        None => true,
        Some(last) => !next.config_eq(last) || !next.reachability_eq(last),
    }
}

fn log_pool_transitions(endpoints: &[String], old: &[HealthRecord], new: &[HealthRecord]) {
    for (endpoint, (old_record, new_record)) in endpoints.iter().zip(old.iter().zip(new)) {
        if old_record.reachable != new_record.reachable {
            tracing::info!(
                backend = %endpoint,
                reachable = new_record.reachable,
                latency_ms = new_record.latency_ms,
                "backend reachability changed"
            );
            metrics::record_backend_health(endpoint, new_record.reachable);
        }
    }
}
