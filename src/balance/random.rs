//! Random selection strategy.

use rand::Rng;

use crate::balance::{PoolView, Strategy};

/// Random selector.
///
/// Picks a uniformly random starting index, then scans forward with the
/// same skip-unreachable semantics as round-robin. The scan visits each
/// entry at most once, so termination is bounded.
#[derive(Debug, Default)]
pub struct Random;

impl Strategy for Random {
    fn select(&self, pool: &PoolView<'_>) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }

        let len = pool.len();
        let start = rand::thread_rng().gen_range(0..len);

        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| pool.eligible(index))
    }
}
