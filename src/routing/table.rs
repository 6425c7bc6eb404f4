//! The active routing table.

use crate::balance::{ListKey, Mode};
use crate::config::schema::{RouteConfig, SlbConfig};
use crate::health::HealthRecord;

/// One fully-formed routing snapshot: normalized configuration plus the
/// health state probed for it.
///
/// At most one table is active at a time. The reload cycle assembles a new
/// value, and the coordinator publishes it atomically; dispatchers only
/// ever read.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    /// Top-level backend pool.
    pub servers: Vec<String>,

    /// Path-prefix routes, consulted when `servers` is empty.
    pub routes: Vec<RouteConfig>,

    /// Port the listener must be bound to, already defaulted.
    pub listen_port: String,

    /// Selection strategy for every pool in this table.
    pub mode: Mode,

    /// Health records for `servers`, index-aligned.
    pub server_health: Vec<HealthRecord>,

    /// Health records per route, index-aligned with `routes` and each
    /// route's endpoint list.
    pub route_health: Vec<Vec<HealthRecord>>,
}

impl RoutingTable {
    /// Assemble a table from a normalized configuration and the probe
    /// results gathered for it.
    ///
    /// The health vectors must have been built from the same lists; the
    /// alignment invariant is checked in debug builds.
    pub fn assemble(
        config: SlbConfig,
        server_health: Vec<HealthRecord>,
        route_health: Vec<Vec<HealthRecord>>,
    ) -> Self {
        debug_assert_eq!(config.servers.len(), server_health.len());
        debug_assert_eq!(config.routes.len(), route_health.len());

        let mode = match Mode::from_label(&config.mode) {
            Some(mode) => mode,
            None => {
                if !config.mode.is_empty() {
                    tracing::warn!(
                        label = %config.mode,
                        "unrecognized selection mode, falling back to round-robin"
                    );
                }
                Mode::RoundRobin
            }
        };

        Self {
            servers: config.servers,
            routes: config.routes,
            listen_port: config.port,
            mode,
            server_health,
            route_health,
        }
    }

    /// The endpoint and health slices for a pool key, if the key is valid
    /// for this table.
    pub fn pool(&self, key: ListKey) -> Option<(&[String], &[HealthRecord])> {
        match key {
            ListKey::Servers => Some((&self.servers, &self.server_health)),
            ListKey::Route(index) => {
                let route = self.routes.get(index)?;
                let health = self.route_health.get(index)?;
                Some((&route.endpoints, health))
            }
        }
    }

    /// True when the configuration content (backends, routes, port, mode)
    /// matches; health state is ignored.
    pub fn config_eq(&self, other: &Self) -> bool {
        self.servers == other.servers
            && self.routes == other.routes
            && self.listen_port == other.listen_port
            && self.mode == other.mode
    }

    /// True when every backend's reachability flag matches. Latency values
    /// are deliberately ignored so jitter alone never forces a republish.
    pub fn reachability_eq(&self, other: &Self) -> bool {
        let flags = |table: &Self| -> Vec<bool> {
            table
                .server_health
                .iter()
                .chain(table.route_health.iter().flatten())
                .map(|record| record.reachable)
                .collect()
        };
        flags(self) == flags(other)
    }
}
