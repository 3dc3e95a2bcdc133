//! Predictor core.
//!
//! This module contains the hardware units driven by the simulation: the
//! branch direction predictors, the data cache, and the prefetch engines
//! that fill it.

/// Prediction and storage units (branch predictors, cache, prefetchers).
pub mod units;
