//! Global Model Constants.
//!
//! Table geometries that are fixed by the modelled hardware rather than
//! supplied through configuration.

/// Number of local history registers in the local predictor.
///
/// A branch selects its register with `pc % LOCAL_HISTORY_REGISTERS`.
pub const LOCAL_HISTORY_REGISTERS: usize = 128;

/// Capacity of every Reference Prediction Table (stride and distance).
pub const RPT_ENTRIES: usize = 64;
