//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of both simulation drivers. It provides:
//! 1. **Branch prediction:** Conditional branches, correct predictions, and outcome mix.
//! 2. **Memory:** Accesses by kind, hits, prefetches, and prefetches later used.
//! 3. **Reports:** Snapshots with `Display` impls in the report file layout.
//!
//! Ratios are printed with six significant digits (`%g` style) and are `0`
//! whenever their denominator is zero.

use std::fmt;

/// Branch simulation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchStats {
    /// Instructions retired, branches included.
    pub instructions: u64,
    /// Conditional branches observed.
    pub conditional_branches: u64,
    /// Predictions that matched the outcome.
    pub correct_predictions: u64,
    /// Branches that were taken.
    pub taken: u64,
    /// Branches that fell through.
    pub not_taken: u64,
    /// Predictions of taken.
    pub predicted_taken: u64,
    /// Predictions of not taken.
    pub predicted_not_taken: u64,
}

impl BranchStats {
    /// Records one predicted branch and its outcome.
    pub const fn record(&mut self, predicted: bool, taken: bool) {
        self.conditional_branches += 1;
        if predicted == taken {
            self.correct_predictions += 1;
        }
        if taken {
            self.taken += 1;
        } else {
            self.not_taken += 1;
        }
        if predicted {
            self.predicted_taken += 1;
        } else {
            self.predicted_not_taken += 1;
        }
    }

    /// Fraction of conditional branches predicted correctly.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct_predictions, self.conditional_branches)
    }

    /// Mispredicted conditional branches.
    pub const fn mispredictions(&self) -> u64 {
        self.conditional_branches - self.correct_predictions
    }
}

/// Memory simulation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Loads plus stores.
    pub accesses: u64,
    /// Load accesses.
    pub loads: u64,
    /// Store accesses.
    pub stores: u64,
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Prefetch fills issued.
    pub prefetches: u64,
    /// Prefetched lines later hit by a demand access.
    pub successful_prefetches: u64,
}

impl MemoryStats {
    /// Fraction of accesses that hit.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses)
    }

    /// Accesses that missed.
    pub const fn misses(&self) -> u64 {
        self.accesses - self.hits
    }

    /// Fraction of issued prefetches that were later used.
    pub fn prefetch_accuracy(&self) -> f64 {
        ratio(self.successful_prefetches, self.prefetches)
    }
}

/// Final branch prediction report.
///
/// ```text
/// Prediction accuracy:	0.75
/// Number of conditional branches:	4
/// Number of correct predictions:	3
/// Number of taken branches:	3
/// Number of non-taken branches:	1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchReport(pub BranchStats);

impl fmt::Display for BranchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        writeln!(f, "Prediction accuracy:\t{}", Ratio(s.accuracy()))?;
        writeln!(f, "Number of conditional branches:\t{}", s.conditional_branches)?;
        writeln!(f, "Number of correct predictions:\t{}", s.correct_predictions)?;
        writeln!(f, "Number of taken branches:\t{}", s.taken)?;
        writeln!(f, "Number of non-taken branches:\t{}", s.not_taken)
    }
}

/// Cache checkpoint report, also written once at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReport(pub MemoryStats);

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        writeln!(f, "The checkpoint has been reached")?;
        writeln!(
            f,
            "Accesses: {} Loads: {} Stores: {}",
            s.accesses, s.loads, s.stores
        )?;
        writeln!(f, "Hits: {}", s.hits)?;
        writeln!(f, "Hit rate: {}", Ratio(s.hit_rate()))?;
        writeln!(f, "Prefetches: {}", s.prefetches)?;
        writeln!(f, "Successful prefetches: {}", s.successful_prefetches)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Formats a float with six significant digits and no trailing zeros.
#[derive(Debug, Clone, Copy)]
pub struct Ratio(pub f64);

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v == 0.0 || !v.is_finite() {
            return write!(f, "{v}");
        }
        let exp = v.abs().log10().floor() as i32;
        if (-4..6).contains(&exp) {
            let decimals = (5 - exp).max(0) as usize;
            f.write_str(trim_fraction(&format!("{v:.decimals$}")))
        } else {
            let s = format!("{v:.5e}");
            let (mantissa, exponent) = s.split_once('e').unwrap_or((&s, "0"));
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{sign}{:02}",
                trim_fraction(mantissa),
                exponent.abs()
            )
        }
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
