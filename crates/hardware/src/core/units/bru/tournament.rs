//! Tournament Branch Predictor.
//!
//! A hybrid predictor that employs a selector table of 2-bit counters to
//! choose between a full [`LocalPredictor`] and a full [`GSharePredictor`].
//! States `10`/`11` favor gshare, `00`/`01` favor local.
//!
//! The selector moves toward whichever component was right and holds when
//! both were wrong. In state `00` a taken branch keeps the selector at `00`
//! regardless of which component was right.

use super::{
    BranchPredictor,
    counter::{PatternHistoryTable, SaturatingCounter},
    gshare::GSharePredictor,
    local::LocalPredictor,
};
use crate::common::ConfigError;

/// Tournament Predictor structure.
#[derive(Debug, Clone)]
pub struct TournamentPredictor {
    /// Selector table, indexed by `pc % entries`.
    choice: PatternHistoryTable,
    /// Per-branch history component.
    local: LocalPredictor,
    /// Global history component.
    gshare: GSharePredictor,
}

impl TournamentPredictor {
    /// Creates a tournament predictor whose selector and both components
    /// each hold `entries` counters.
    ///
    /// # Errors
    ///
    /// See [`PatternHistoryTable::new`].
    pub fn new(entries: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            choice: PatternHistoryTable::new(entries)?,
            local: LocalPredictor::new(entries)?,
            gshare: GSharePredictor::new(entries)?,
        })
    }

    fn choice_index(&self, pc: u64) -> u64 {
        pc % self.choice.len()
    }

    /// Selector counter currently consulted for `pc`.
    pub fn selector(&self, pc: u64) -> SaturatingCounter {
        self.choice.get(self.choice_index(pc))
    }

    /// Read-only view of the local component.
    pub const fn local(&self) -> &LocalPredictor {
        &self.local
    }

    /// Read-only view of the gshare component.
    pub const fn gshare(&self) -> &GSharePredictor {
        &self.gshare
    }
}

/// Next selector state given which components predicted correctly.
fn next_selector(
    state: SaturatingCounter,
    taken: bool,
    local_right: bool,
    gshare_right: bool,
) -> SaturatingCounter {
    match state {
        SaturatingCounter::STRONG_TAKEN => {
            if !gshare_right && local_right {
                SaturatingCounter::WEAK_TAKEN
            } else {
                state
            }
        }
        SaturatingCounter::WEAK_TAKEN => {
            if gshare_right {
                SaturatingCounter::STRONG_TAKEN
            } else if local_right {
                SaturatingCounter::WEAK_NOT_TAKEN
            } else {
                state
            }
        }
        SaturatingCounter::WEAK_NOT_TAKEN => {
            if local_right {
                SaturatingCounter::STRONG_NOT_TAKEN
            } else if gshare_right {
                SaturatingCounter::WEAK_TAKEN
            } else {
                state
            }
        }
        _ => {
            if !taken && gshare_right && !local_right {
                SaturatingCounter::WEAK_NOT_TAKEN
            } else {
                state
            }
        }
    }
}

impl BranchPredictor for TournamentPredictor {
    /// Returns gshare's prediction when the selector is `10`/`11`,
    /// otherwise local's.
    fn predict(&self, pc: u64) -> bool {
        if self.selector(pc).is_taken() {
            self.gshare.predict(pc)
        } else {
            self.local.predict(pc)
        }
    }

    /// Updates the selector from both components' pre-training predictions,
    /// then trains both components.
    fn train(&mut self, pc: u64, taken: bool) {
        let local_right = self.local.predict(pc) == taken;
        let gshare_right = self.gshare.predict(pc) == taken;

        let idx = self.choice_index(pc);
        let slot = self.choice.get_mut(idx);
        *slot = next_selector(*slot, taken, local_right, gshare_right);

        self.local.train(pc, taken);
        self.gshare.train(pc, taken);
    }
}
