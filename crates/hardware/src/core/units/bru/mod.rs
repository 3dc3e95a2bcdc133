//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors: static always-taken,
//! local two-level, gshare, and a tournament of local and gshare. All
//! table-based predictors share the 2-bit counter tables in [`counter`].

pub use self::branch_predictor::BranchPredictor;

/// Branch predictor trait.
pub mod branch_predictor;

/// Two-bit saturating counters, pattern history tables and history shifting.
pub mod counter;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Per-branch local history predictor.
pub mod local;

/// Static branch predictor (always taken).
pub mod static_bp;

/// Tournament branch predictor (selects between local and gshare).
pub mod tournament;

use self::{
    gshare::GSharePredictor, local::LocalPredictor, static_bp::AlwaysTakenPredictor,
    tournament::TournamentPredictor,
};
use crate::common::ConfigError;
use crate::config::{BranchConfig, BranchPredictorKind};

/// Enum wrapper for static dispatch of Branch Predictors.
/// This avoids vtable lookups in the per-branch hot path.
#[derive(Debug, Clone)]
pub enum BranchPredictorWrapper {
    /// Always-taken predictor.
    AlwaysTaken(AlwaysTakenPredictor),
    /// Local history predictor.
    Local(LocalPredictor),
    /// Gshare predictor.
    GShare(GSharePredictor),
    /// Tournament of local and gshare.
    Tournament(Box<TournamentPredictor>),
}

impl BranchPredictorWrapper {
    /// Creates the predictor variant `kind` with `entries` counters per table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroEntries`] if a table-based variant is
    /// requested with zero entries, or [`ConfigError::TableTooLarge`] if its
    /// tables cannot be allocated.
    pub fn new(kind: BranchPredictorKind, entries: u64) -> Result<Self, ConfigError> {
        let bp = match kind {
            BranchPredictorKind::AlwaysTaken => {
                Self::AlwaysTaken(AlwaysTakenPredictor::new(entries))
            }
            BranchPredictorKind::Local => Self::Local(LocalPredictor::new(entries)?),
            BranchPredictorKind::Gshare => Self::GShare(GSharePredictor::new(entries)?),
            BranchPredictorKind::Tournament => {
                Self::Tournament(Box::new(TournamentPredictor::new(entries)?))
            }
        };
        tracing::debug!(predictor = %kind, entries, "branch predictor created");
        Ok(bp)
    }

    /// Creates the predictor described by a [`BranchConfig`].
    ///
    /// # Errors
    ///
    /// See [`BranchPredictorWrapper::new`].
    pub fn from_config(config: &BranchConfig) -> Result<Self, ConfigError> {
        Self::new(config.predictor, config.entries)
    }

    /// Returns the variant of this predictor.
    pub const fn kind(&self) -> BranchPredictorKind {
        match self {
            Self::AlwaysTaken(_) => BranchPredictorKind::AlwaysTaken,
            Self::Local(_) => BranchPredictorKind::Local,
            Self::GShare(_) => BranchPredictorKind::Gshare,
            Self::Tournament(_) => BranchPredictorKind::Tournament,
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict(&self, pc: u64) -> bool {
        match self {
            Self::AlwaysTaken(bp) => bp.predict(pc),
            Self::Local(bp) => bp.predict(pc),
            Self::GShare(bp) => bp.predict(pc),
            Self::Tournament(bp) => bp.predict(pc),
        }
    }

    #[inline(always)]
    fn train(&mut self, pc: u64, taken: bool) {
        match self {
            Self::AlwaysTaken(bp) => bp.train(pc, taken),
            Self::Local(bp) => bp.train(pc, taken),
            Self::GShare(bp) => bp.train(pc, taken),
            Self::Tournament(bp) => bp.train(pc, taken),
        }
    }
}
