//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that all direction
//! predictors implement. Callers query [`BranchPredictor::predict`] and then
//! call [`BranchPredictor::train`] exactly once per conditional branch.

/// Trait for branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts whether the conditional branch at `pc` will be taken.
    ///
    /// This is a pure read; no predictor state changes.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    fn predict(&self, pc: u64) -> bool;

    /// Trains the predictor with the resolved outcome of the branch at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    fn train(&mut self, pc: u64, taken: bool);
}
