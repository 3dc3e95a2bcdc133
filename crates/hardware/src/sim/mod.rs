//! Simulation drivers and trace input.
//!
//! Each driver owns one model and its counters, consumes events one at a
//! time and tells the caller when a report is due:
//! 1. **Branch:** [`BranchSimulation`] feeds a branch predictor and counts outcomes.
//! 2. **Memory:** [`MemorySimulation`] feeds a cache and its prefetcher.
//! 3. **Trace:** [`trace::TraceReader`] decodes text traces into [`trace::TraceEvent`]s.

/// Branch predictor driver.
pub mod branch;
/// Cache and prefetcher driver.
pub mod memory;
/// Text trace format.
pub mod trace;

pub use self::branch::BranchSimulation;
pub use self::memory::MemorySimulation;

/// Outcome of feeding one event to a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Step<R> {
    /// Nothing to report.
    Continue,
    /// A periodic checkpoint was reached.
    Checkpoint(R),
    /// The stop point was reached; later events are ignored.
    Stop(R),
}

impl<R> Step<R> {
    /// Returns `true` for [`Step::Stop`].
    pub const fn is_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

/// Returns `true` if a counter moving from `prev` to `next` crosses a
/// multiple of `interval`.
#[inline]
pub(crate) const fn crosses(prev: u64, next: u64, interval: u64) -> bool {
    interval != 0 && next / interval > prev / interval
}

/// Returns `true` if a counter moving from `prev` to `next` reaches `limit`.
/// A zero limit never fires.
#[inline]
pub(crate) const fn reaches(prev: u64, next: u64, limit: u64) -> bool {
    limit != 0 && prev < limit && next >= limit
}
