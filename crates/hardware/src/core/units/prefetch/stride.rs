//! Stride Prefetcher.
//!
//! A prefetcher that detects constant stride patterns per load instruction.
//! It maintains a 64-entry Reference Prediction Table keyed by load PC; each
//! entry records the last address, the current stride and a 4-state
//! confidence machine:
//!
//! | state        | correct                          | wrong                |
//! |--------------|----------------------------------|----------------------|
//! | Initial      | Steady                           | Transient, new stride |
//! | Transient    | Steady                           | NoPrediction, new stride |
//! | Steady       | Steady, last += aggression·block | Initial, new stride  |
//! | NoPrediction | Transient                        | NoPrediction, new stride |
//!
//! "Correct" means the access landed on `last_addr + stride`. Prefetching is
//! triggered only by a correct access to a Steady entry.
//!
//! # Performance
//!
//! - **Time Complexity:** O(T) table scan per call, O(A) fills on a trigger
//! - **Space Complexity:** O(T) with T = 64 entries
//! - **Best Case:** Regular strided patterns (array traversals, matrix operations)
//! - **Worst Case:** Irregular or random access patterns (linked lists, hash tables)

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Prefetcher, next_line::fan_out, rpt::ReferencePredictionTable};
use crate::core::units::cache::Cache;

/// Confidence state of a stride entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrideState {
    /// Newly allocated or recovering from a Steady mispredict.
    #[default]
    Initial,
    /// One stride observed, not yet confirmed.
    Transient,
    /// Stride confirmed; prefetching enabled.
    Steady,
    /// Repeated mispredictions.
    NoPrediction,
}

/// Entry in the Reference Prediction Table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideEntry {
    /// Load instruction PC (the table key).
    pub pc: u64,
    /// Last address seen, or the end of the outstanding prefetch stream
    /// while Steady.
    pub last_addr: u64,
    /// Detected stride in bytes.
    pub stride: i64,
    /// Confidence state.
    pub state: StrideState,
}

impl StrideEntry {
    const fn new(pc: u64, addr: u64) -> Self {
        Self {
            pc,
            last_addr: addr,
            stride: 0,
            state: StrideState::Initial,
        }
    }

    /// Address this entry expects next.
    #[inline]
    pub const fn predicted(&self) -> u64 {
        self.last_addr.wrapping_add_signed(self.stride)
    }

    /// Runs the state machine for an access to `addr`.
    ///
    /// `stream_step` is the distance a Steady entry advances on a correct
    /// prediction (aggression × block size).
    fn observe(&mut self, addr: u64, stream_step: u64) {
        let correct = addr == self.predicted();
        let observed = addr.wrapping_sub(self.last_addr) as i64;

        match (self.state, correct) {
            (StrideState::Steady, true) => {
                self.last_addr = addr.wrapping_add(stream_step);
                return;
            }
            (StrideState::Initial | StrideState::Transient, true) => {
                self.state = StrideState::Steady;
            }
            (StrideState::NoPrediction, true) => {
                self.state = StrideState::Transient;
            }
            (state, false) => {
                self.state = match state {
                    StrideState::Initial => StrideState::Transient,
                    StrideState::Transient | StrideState::NoPrediction => {
                        StrideState::NoPrediction
                    }
                    StrideState::Steady => StrideState::Initial,
                };
                self.stride = observed;
            }
        }
        self.last_addr = addr;
    }
}

/// Stride Prefetcher state.
#[derive(Debug, Clone)]
pub struct StridePrefetcher {
    /// Reference Prediction Table keyed by load PC.
    table: ReferencePredictionTable<StrideEntry>,
    /// Size of a cache block in bytes.
    block_bytes: u64,
    /// Number of blocks to prefetch per trigger.
    aggression: usize,
    /// Victim selection for a full table.
    rng: StdRng,
}

impl StridePrefetcher {
    /// Creates a new Stride prefetcher.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - The size of a cache block in bytes.
    /// * `aggression` - The number of blocks to prefetch per trigger.
    /// * `seed` - Seed for random replacement in a full table.
    pub fn new(block_bytes: u64, aggression: usize, seed: u64) -> Self {
        Self {
            table: ReferencePredictionTable::new(),
            block_bytes,
            aggression,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Looks up the entry tracking `pc`.
    pub fn entry(&self, pc: u64) -> Option<&StrideEntry> {
        self.table
            .position(|e| e.pc == pc)
            .and_then(|idx| self.table.get(idx))
    }

    /// Number of PCs currently tracked.
    pub fn tracked(&self) -> usize {
        self.table.len()
    }
}

impl Prefetcher for StridePrefetcher {
    /// Fans out `aggression` blocks after `addr` when the load's entry is
    /// Steady and predicted this address.
    fn prefetch(&mut self, cache: &mut Cache, addr: u64, pc: u64) -> u64 {
        match self.entry(pc) {
            Some(e) if e.state == StrideState::Steady && e.predicted() == addr => {
                fan_out(cache, addr, self.block_bytes, self.aggression)
            }
            _ => 0,
        }
    }

    fn train(&mut self, addr: u64, pc: u64) {
        let stream_step = (self.aggression as u64).wrapping_mul(self.block_bytes);
        match self.table.position(|e| e.pc == pc) {
            Some(idx) => {
                if let Some(entry) = self.table.get_mut(idx) {
                    entry.observe(addr, stream_step);
                }
            }
            None => {
                let idx = self
                    .table
                    .allocate(StrideEntry::new(pc, addr), &mut self.rng);
                tracing::trace!(pc, idx, "stride entry allocated");
            }
        }
    }
}
