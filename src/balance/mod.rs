//! Backend selection subsystem.
//!
//! # Data Flow
//! ```text
//! Request resolved to a pool (top-level servers or a route's endpoints)
//!     → PoolView (endpoints + health records + rotation counter)
//!     → Apply selection strategy:
//!         - round_robin.rs (rotate through eligible backends)
//!         - random.rs (random start, then scan for eligible)
//!         - least_latency.rs (minimum positive probe latency)
//!     → Return backend index or None (every entry empty/unreachable)
//! ```
//!
//! # Design Decisions
//! - Strategies are stateless; the rotation counter lives outside the
//!   snapshot (rotation.rs) so it survives table republishes
//! - Every strategy scans at most `len` candidates, so an all-unreachable
//!   pool yields `None` in bounded time instead of spinning
//! - `None` is the caller's signal to answer 503, never a panic

use std::sync::atomic::AtomicUsize;

use crate::health::HealthRecord;

pub mod least_latency;
pub mod random;
pub mod rotation;
pub mod round_robin;

pub use rotation::{ListKey, RotationCounters};

/// Selection strategy, as configured by the `mode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rotate through the pool, skipping unreachable entries.
    #[default]
    RoundRobin,
    /// Uniformly random starting index, same skip semantics.
    Random,
    /// Backend with the smallest positive probe latency.
    Best,
}

impl Mode {
    /// Parse a configuration label. Returns `None` for unknown labels so the
    /// caller can decide the fallback.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "roundrobin" | "round-robin" => Some(Self::RoundRobin),
            "random" => Some(Self::Random),
            "best" => Some(Self::Best),
            _ => None,
        }
    }

    /// Canonical configuration label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoundRobin => "roundrobin",
            Self::Random => "random",
            Self::Best => "best",
        }
    }

    /// Next mode in the toggle cycle used by the `/chgmode` endpoint.
    pub fn next(&self) -> Self {
        match self {
            Self::RoundRobin => Self::Random,
            Self::Random => Self::Best,
            Self::Best => Self::RoundRobin,
        }
    }

    /// The strategy implementing this mode.
    pub fn strategy(&self) -> &'static dyn Strategy {
        match self {
            Self::RoundRobin => &round_robin::RoundRobin,
            Self::Random => &random::Random,
            Self::Best => &least_latency::LeastLatency,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One pool as seen by a strategy for a single selection.
///
/// Borrows from the request's RoutingTable snapshot; the endpoint and
/// health slices are always the same length.
pub struct PoolView<'a> {
    pub endpoints: &'a [String],
    pub health: &'a [HealthRecord],
    pub counter: &'a AtomicUsize,
}

impl PoolView<'_> {
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// An entry is eligible when it is non-empty and its last probe
    /// succeeded.
    pub fn eligible(&self, index: usize) -> bool {
        !self.endpoints[index].is_empty() && self.health[index].reachable
    }
}

/// Pure decision logic: pick an index into the pool, or `None` when no
/// entry is eligible.
pub trait Strategy: Send + Sync {
    fn select(&self, pool: &PoolView<'_>) -> Option<usize>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for mode in [Mode::RoundRobin, Mode::Random, Mode::Best] {
            assert_eq!(Mode::from_label(mode.label()), Some(mode));
        }
        assert_eq!(Mode::from_label("weighted"), None);
        assert_eq!(Mode::from_label(""), None);
    }

    #[test]
    fn toggle_cycles_through_all_modes() {
        let start = Mode::RoundRobin;
        let mut mode = start;
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(mode, start);
        assert!(seen.contains(&Mode::Random));
        assert!(seen.contains(&Mode::Best));
    }
}
