//! Branch simulation driver.
//!
//! Counts retired instructions, runs predict-then-train for every
//! conditional branch and keeps the outcome counters. A heartbeat is logged
//! every `heartbeat_interval` instructions and the run stops once
//! `stop_after` instructions have retired.

use super::{Step, crosses, reaches, trace::TraceEvent};
use crate::common::ConfigError;
use crate::config::{Config, GeneralConfig};
use crate::core::units::bru::{BranchPredictor, BranchPredictorWrapper};
use crate::stats::{BranchReport, BranchStats};

/// Drives one branch predictor over an event stream.
#[derive(Debug, Clone)]
pub struct BranchSimulation {
    predictor: BranchPredictorWrapper,
    stats: BranchStats,
    heartbeat_interval: u64,
    stop_after: u64,
    stopped: bool,
}

impl BranchSimulation {
    /// Builds the predictor and limits described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] of the general or branch section.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.general.validate()?;
        config.branch.validate()?;
        let predictor = BranchPredictorWrapper::from_config(&config.branch)?;
        Ok(Self::with_predictor(predictor, &config.general))
    }

    /// Wraps an already-built predictor.
    pub fn with_predictor(predictor: BranchPredictorWrapper, general: &GeneralConfig) -> Self {
        Self {
            predictor,
            stats: BranchStats::default(),
            heartbeat_interval: general.heartbeat_interval,
            stop_after: general.stop_after,
            stopped: false,
        }
    }

    /// Retires `count` non-branch instructions.
    pub fn on_instruction(&mut self, count: u64) -> Step<BranchReport> {
        if self.stopped {
            return Step::Stop(self.report());
        }
        self.advance(count)
    }

    /// Predicts and trains one conditional branch, which also retires one
    /// instruction.
    pub fn on_branch(&mut self, pc: u64, taken: bool) -> Step<BranchReport> {
        if self.stopped {
            return Step::Stop(self.report());
        }
        let predicted = self.predictor.predict(pc);
        self.predictor.train(pc, taken);
        self.stats.record(predicted, taken);
        self.advance(1)
    }

    /// Feeds a decoded trace event. Memory events only retire an
    /// instruction.
    pub fn on_event(&mut self, event: TraceEvent) -> Step<BranchReport> {
        match event {
            TraceEvent::Branch { pc, taken } => self.on_branch(pc, taken),
            TraceEvent::Instructions(count) => self.on_instruction(count),
            TraceEvent::Load { .. } | TraceEvent::Store { .. } => self.on_instruction(1),
        }
    }

    fn advance(&mut self, count: u64) -> Step<BranchReport> {
        let prev = self.stats.instructions;
        let next = prev.saturating_add(count);
        self.stats.instructions = next;

        if crosses(prev, next, self.heartbeat_interval) {
            tracing::info!(instructions = next, "heartbeat");
        }
        if reaches(prev, next, self.stop_after) {
            self.stopped = true;
            tracing::warn!(instructions = next, "stop point reached, detaching");
            return Step::Stop(self.report());
        }
        Step::Continue
    }

    /// Current counters.
    pub const fn stats(&self) -> &BranchStats {
        &self.stats
    }

    /// Snapshot of the counters as a printable report.
    pub const fn report(&self) -> BranchReport {
        BranchReport(self.stats)
    }

    /// The predictor being driven.
    pub const fn predictor(&self) -> &BranchPredictorWrapper {
        &self.predictor
    }

    /// Returns `true` once the stop point has been reached.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}
