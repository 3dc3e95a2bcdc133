//! Common utilities and types shared by the predictor and cache models.
//!
//! This module provides:
//! 1. **Constants:** Fixed table geometries of the modelled hardware.
//! 2. **Error Handling:** Configuration and trace error types.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for configuration and trace input.
pub mod error;

pub use error::{ConfigError, TraceError};
