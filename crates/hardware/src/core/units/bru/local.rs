//! Local Branch Predictor.
//!
//! A two-level predictor with per-branch history. The branch PC selects one
//! of 128 local history registers (`pc % 128`), and that register's value
//! indexes a shared pattern history table of 2-bit counters.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `train()` are O(1)
//! - **Space Complexity:** O(N) counters plus 128 history registers
//! - **Best Case:** Loop branches whose pattern repeats per PC
//! - **Worst Case:** Many PCs aliasing onto the same history register

use super::{
    BranchPredictor,
    counter::{PatternHistoryTable, shift_history},
};
use crate::common::ConfigError;
use crate::common::constants::LOCAL_HISTORY_REGISTERS;

/// Local predictor state.
#[derive(Debug, Clone)]
pub struct LocalPredictor {
    /// Local history registers, each kept in `[0, pht.len())`.
    lhrs: [u64; LOCAL_HISTORY_REGISTERS],
    /// Pattern history table indexed by a local history register.
    pht: PatternHistoryTable,
}

impl LocalPredictor {
    /// Creates a local predictor with `entries` pattern history counters.
    ///
    /// # Errors
    ///
    /// See [`PatternHistoryTable::new`].
    pub fn new(entries: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            lhrs: [0; LOCAL_HISTORY_REGISTERS],
            pht: PatternHistoryTable::new(entries)?,
        })
    }

    #[inline]
    const fn lhr_index(pc: u64) -> usize {
        (pc % LOCAL_HISTORY_REGISTERS as u64) as usize
    }

    /// Current value of the history register selected by `pc`.
    pub const fn history(&self, pc: u64) -> u64 {
        self.lhrs[Self::lhr_index(pc)]
    }

    /// Read-only view of the pattern history table.
    pub const fn pht(&self) -> &PatternHistoryTable {
        &self.pht
    }
}

impl BranchPredictor for LocalPredictor {
    fn predict(&self, pc: u64) -> bool {
        self.pht.predict(self.history(pc))
    }

    /// Updates the counter addressed by the branch's local history, then
    /// shifts the outcome into that history register.
    fn train(&mut self, pc: u64, taken: bool) {
        let lhr = Self::lhr_index(pc);
        let pattern = self.lhrs[lhr];
        self.pht.update(pattern, taken);
        self.lhrs[lhr] = shift_history(pattern, taken, self.pht.len());
    }
}
