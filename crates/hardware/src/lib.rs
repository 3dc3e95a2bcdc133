//! Trace-driven branch predictor and cache prefetcher models.
//!
//! This crate implements the prediction and training logic of classic
//! micro-architectural predictors with the following:
//! 1. **Branch prediction:** Always-taken, local, gshare and tournament direction predictors.
//! 2. **Memory:** A set-associative LRU cache with demand and prefetch fill paths.
//! 3. **Prefetching:** Next-N-line, stride RPT and distance RPT prefetchers.
//! 4. **Simulation:** Event drivers, trace parsing, configuration and statistics.

/// Common types and constants (errors, table sizes).
pub mod common;
/// Simulator configuration (defaults, variant enums, validation).
pub mod config;
/// Predictor and cache units.
pub mod core;
/// Simulation drivers and trace reader.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Set-associative cache owned by a memory simulation.
pub use crate::core::units::cache::Cache;
/// Drivers that own one predictor core each.
pub use crate::sim::{BranchSimulation, MemorySimulation};
