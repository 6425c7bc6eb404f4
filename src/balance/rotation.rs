//! Rotation counters for round-robin selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::routing::table::RoutingTable;

/// Identifies one backend pool: the top-level server list or a route's
/// endpoint list by ordinal index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    Servers,
    Route(usize),
}

impl std::fmt::Display for ListKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Servers => f.write_str("servers"),
            Self::Route(index) => write!(f, "route[{index}]"),
        }
    }
}

/// One rotation counter per backend pool, shared by every request that
/// selects from that pool.
///
/// Counters live outside the RoutingTable snapshot so they survive
/// republishes; `sync` resets exactly the pools whose endpoint lists
/// changed.
#[derive(Debug, Default)]
pub struct RotationCounters {
    counters: DashMap<ListKey, Arc<AtomicUsize>>,
}

impl RotationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (creating on first use) the counter for a pool.
    pub fn counter(&self, key: ListKey) -> Arc<AtomicUsize> {
        self.counters.entry(key).or_default().value().clone()
    }

    /// Reconcile counters with a freshly published table: counters whose
    /// backing endpoint list changed restart at zero, counters for routes
    /// that no longer exist are dropped, everything else keeps rotating
    /// where it left off.
    pub fn sync(&self, previous: Option<&RoutingTable>, next: &RoutingTable) {
        let Some(previous) = previous else {
            self.counters.clear();
            return;
        };

        if previous.servers != next.servers {
            self.reset(ListKey::Servers);
        }

        for (index, route) in next.routes.iter().enumerate() {
            let changed = previous
                .routes
                .get(index)
                .map_or(true, |old| old.endpoints != route.endpoints);
            if changed {
                self.reset(ListKey::Route(index));
            }
        }

        let route_count = next.routes.len();
        self.counters.retain(|key, _| match key {
            ListKey::Servers => true,
            ListKey::Route(index) => *index < route_count,
        });
    }

    fn reset(&self, key: ListKey) {
        if let Some(counter) = self.counters.get(&key) {
            tracing::debug!(pool = %key, "rotation counter reset");
            counter.store(0, Ordering::Relaxed);
        }
    }
}
