//! Predictor and memory units.
//!
//! Each unit is queried for a prediction or action and then trained with the
//! true outcome, in that order, once per event.

/// Branch Resolution Unit: direction predictors and their counter tables.
pub mod bru;

/// Set-associative cache with demand and prefetch fill paths.
pub mod cache;

/// Hardware prefetcher implementations (next-N-line, stride, distance).
pub mod prefetch;
