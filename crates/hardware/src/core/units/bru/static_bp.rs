//! Static Branch Predictor.
//!
//! Implements an "Always Taken" policy for conditional branches. It keeps no
//! history, so training is a no-op.

use super::BranchPredictor;

/// Always-taken predictor.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTakenPredictor;

impl AlwaysTakenPredictor {
    /// Creates a new always-taken predictor.
    ///
    /// The entry count is accepted for interface symmetry with the
    /// table-based predictors and ignored.
    pub const fn new(_entries: u64) -> Self {
        Self
    }
}

impl BranchPredictor for AlwaysTakenPredictor {
    /// Always predicts taken.
    fn predict(&self, _pc: u64) -> bool {
        true
    }

    /// Does nothing; there is no history to update.
    fn train(&mut self, _pc: u64, _taken: bool) {}
}
