//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `train()`: O(1)
//! - **Space Complexity:** O(N) for an N-entry PHT of 2-bit counters
//! - **Hardware Cost:** Moderate - single PHT lookup, XOR, and counter update
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches or history length too short/long for pattern

use super::{
    BranchPredictor,
    counter::{PatternHistoryTable, shift_history},
};
use crate::common::ConfigError;

/// GShare Predictor structure.
#[derive(Debug, Clone)]
pub struct GSharePredictor {
    /// Global History Register, kept in `[0, pht.len())`.
    ghr: u64,
    /// Pattern History Table containing 2-bit saturating counters.
    pht: PatternHistoryTable,
}

impl GSharePredictor {
    /// Creates a new GShare predictor with `entries` counters.
    ///
    /// # Errors
    ///
    /// See [`PatternHistoryTable::new`].
    pub fn new(entries: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            ghr: 0,
            pht: PatternHistoryTable::new(entries)?,
        })
    }

    /// Calculates the index into the Pattern History Table.
    ///
    /// Computes `(pc % entries) ^ ghr`. When `entries` is not a power of two
    /// the XOR can exceed the table, so the result is reduced once more; for
    /// power-of-two tables the reduction never changes the index.
    fn index(&self, pc: u64) -> u64 {
        let entries = self.pht.len();
        ((pc % entries) ^ self.ghr) % entries
    }

    /// Current value of the global history register.
    pub const fn history(&self) -> u64 {
        self.ghr
    }
}

impl BranchPredictor for GSharePredictor {
    /// Returns true if the 2-bit counter at the hashed index is `10` or `11`.
    fn predict(&self, pc: u64) -> bool {
        self.pht.predict(self.index(pc))
    }

    /// Updates the 2-bit saturating counter in the PHT and shifts the new
    /// outcome into the Global History Register.
    fn train(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        self.pht.update(idx, taken);
        self.ghr = shift_history(self.ghr, taken, self.pht.len());
    }
}
