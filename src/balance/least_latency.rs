//! Least-latency selection strategy.

use crate::balance::{PoolView, Strategy};

/// Least-latency selector.
///
/// Scans the pool's health records for the minimum positive probe latency.
/// Entries with latency <= 0 (unreachable or unmeasured) are ignored; ties
/// go to the lowest index because the comparison is strict.
#[derive(Debug, Default)]
pub struct LeastLatency;

impl Strategy for LeastLatency {
    fn select(&self, pool: &PoolView<'_>) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;

        for (index, record) in pool.health.iter().enumerate() {
            if !pool.eligible(index) || !record.has_latency() {
                continue;
            }
            match best {
                Some((_, best_latency)) if record.latency_ms >= best_latency => {}
                _ => best = Some((index, record.latency_ms)),
            }
        }

        best.map(|(index, _)| index)
    }
}
