//! Round-robin selection strategy.

use std::sync::atomic::Ordering;

use crate::balance::{PoolView, Strategy};

/// Round-robin selector.
///
/// Advances the pool's rotation counter once per selection and scans
/// forward from it, so the scan is bounded even when every entry is
/// unreachable.
#[derive(Debug, Default)]
pub struct RoundRobin;

impl Strategy for RoundRobin {
    fn select(&self, pool: &PoolView<'_>) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }

        let len = pool.len();
        let start = pool.counter.fetch_add(1, Ordering::Relaxed);

        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| pool.eligible(index))
    }
}
