//! Configuration and trace error definitions.
//!
//! The predictor and cache operations themselves are total functions over
//! `u64` inputs and never fail. Every failure the crate can report happens
//! either while building a model from its configuration or while reading an
//! event trace:
//! 1. **Configuration errors:** Rejected table geometries, unknown variant names, malformed JSON.
//! 2. **Trace errors:** I/O failures and malformed trace lines.

use thiserror::Error;

/// Error raised when a model cannot be built from its configuration.
///
/// Construction always fails before the first event is processed, so a
/// simulation never discovers a bad geometry mid-stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A pattern history table was requested with zero entries.
    #[error("branch predictor table must have at least one entry")]
    ZeroEntries,

    /// A cache was requested with zero sets.
    #[error("cache must have at least one set")]
    ZeroSets,

    /// A cache was requested with zero ways.
    #[error("cache associativity must be at least 1")]
    ZeroAssociativity,

    /// A cache was requested with a zero-byte block.
    #[error("cache block size must be at least 1 byte")]
    ZeroBlockSize,

    /// A table (pattern history or cache lines) could not be allocated.
    #[error("table of {0} entries is too large to allocate")]
    TableTooLarge(u64),

    /// A prefetcher other than `none` was requested with zero aggression.
    #[error("prefetcher `{0}` requires an aggression of at least 1")]
    ZeroAggression(&'static str),

    /// A periodic interval (heartbeat or checkpoint) was set to zero.
    #[error("`{0}` interval must be non-zero")]
    ZeroInterval(&'static str),

    /// A predictor or prefetcher name did not match any known variant.
    #[error("unknown {kind} `{name}` (expected one of: {expected})")]
    UnknownVariant {
        /// Family being parsed ("branch predictor" or "prefetcher").
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// Comma-separated list of accepted names.
        expected: &'static str,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Error raised while reading an event trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace source could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not match any event form.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number in the trace.
        line: usize,
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl TraceError {
    /// Builds a [`TraceError::Malformed`] for the given line.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
