//! Next-N-Line Prefetcher.
//!
//! A simple spatial prefetcher that fetches the next sequential block(s)
//! after every demand miss. It keeps no learned state.

use super::{Prefetcher, fill_if_absent};
use crate::core::units::cache::Cache;

/// Next-N-Line Prefetcher state.
#[derive(Debug, Clone)]
pub struct NextLinePrefetcher {
    /// Size of a cache block in bytes.
    block_bytes: u64,
    /// Number of subsequent blocks to prefetch.
    aggression: usize,
}

impl NextLinePrefetcher {
    /// Creates a new Next-N-Line prefetcher.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - The size of a cache block in bytes.
    /// * `aggression` - The number of blocks to prefetch ahead.
    pub const fn new(block_bytes: u64, aggression: usize) -> Self {
        Self {
            block_bytes,
            aggression,
        }
    }
}

/// Fills `addr + i * block_bytes` for `i = 1..=aggression`, skipping
/// resident blocks. Returns the number of fills issued.
///
/// The offsets are applied to `addr` as given, without aligning it to a
/// block boundary.
pub(crate) fn fan_out(cache: &mut Cache, addr: u64, block_bytes: u64, aggression: usize) -> u64 {
    let mut issued = 0;
    for i in 1..=aggression as u64 {
        let target = addr.wrapping_add(i.wrapping_mul(block_bytes));
        if fill_if_absent(cache, target) {
            issued += 1;
        }
    }
    issued
}

impl Prefetcher for NextLinePrefetcher {
    fn prefetch(&mut self, cache: &mut Cache, addr: u64, _pc: u64) -> u64 {
        fan_out(cache, addr, self.block_bytes, self.aggression)
    }

    fn train(&mut self, _addr: u64, _pc: u64) {}
}
