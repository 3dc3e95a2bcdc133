//! Two-bit saturating counters and pattern history tables.
//!
//! Every table-based predictor in this crate stores 2-bit counters with the
//! same transition law:
//!
//! | state | taken | not taken |
//! |-------|-------|-----------|
//! | `11`  | `11`  | `10`      |
//! | `10`  | `11`  | `01`      |
//! | `01`  | `10`  | `00`      |
//! | `00`  | `01`  | `00`      |
//!
//! A counter predicts taken iff it is in `10` or `11`. Tables start with
//! every counter in `11` (strongly taken).

use crate::common::ConfigError;

/// A 2-bit saturating counter holding a state in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaturatingCounter(u8);

impl SaturatingCounter {
    /// State `00`.
    pub const STRONG_NOT_TAKEN: Self = Self(0b00);
    /// State `01`.
    pub const WEAK_NOT_TAKEN: Self = Self(0b01);
    /// State `10`.
    pub const WEAK_TAKEN: Self = Self(0b10);
    /// State `11`.
    pub const STRONG_TAKEN: Self = Self(0b11);

    /// Builds a counter from its 2-bit encoding, or `None` if out of range.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= 0b11 { Some(Self(bits)) } else { None }
    }

    /// Returns the 2-bit encoding of the state.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when the counter is in `10` or `11`.
    #[inline]
    pub const fn is_taken(self) -> bool {
        self.0 >= 0b10
    }

    /// Moves one step toward the observed outcome, saturating at either end.
    #[inline]
    pub const fn update(&mut self, taken: bool) {
        if taken {
            if self.0 < 0b11 {
                self.0 += 1;
            }
        } else if self.0 > 0b00 {
            self.0 -= 1;
        }
    }
}

impl Default for SaturatingCounter {
    fn default() -> Self {
        Self::STRONG_TAKEN
    }
}

/// A fixed-size table of [`SaturatingCounter`]s.
///
/// The size is chosen at construction and never changes. Callers are
/// responsible for producing indices below [`PatternHistoryTable::len`].
#[derive(Debug, Clone)]
pub struct PatternHistoryTable {
    counters: Vec<SaturatingCounter>,
}

impl PatternHistoryTable {
    /// Creates a table of `entries` counters, all in state `11`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroEntries`] if `entries` is zero, or
    /// [`ConfigError::TableTooLarge`] if the table cannot be allocated.
    pub fn new(entries: u64) -> Result<Self, ConfigError> {
        if entries == 0 {
            return Err(ConfigError::ZeroEntries);
        }
        let len = usize::try_from(entries).map_err(|_| ConfigError::TableTooLarge(entries))?;
        let mut counters = Vec::new();
        counters
            .try_reserve_exact(len)
            .map_err(|_| ConfigError::TableTooLarge(entries))?;
        counters.resize(len, SaturatingCounter::default());
        Ok(Self { counters })
    }

    /// Number of counters in the table.
    #[inline]
    pub fn len(&self) -> u64 {
        self.counters.len() as u64
    }

    /// Always `false`; tables are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Returns the counter at `idx`.
    #[inline]
    pub fn get(&self, idx: u64) -> SaturatingCounter {
        self.counters[idx as usize]
    }

    /// Returns a mutable reference to the counter at `idx`.
    #[inline]
    pub fn get_mut(&mut self, idx: u64) -> &mut SaturatingCounter {
        &mut self.counters[idx as usize]
    }

    /// Predicts using the counter at `idx`.
    #[inline]
    pub fn predict(&self, idx: u64) -> bool {
        self.get(idx).is_taken()
    }

    /// Trains the counter at `idx` with the observed outcome.
    #[inline]
    pub fn update(&mut self, idx: u64, taken: bool) {
        self.get_mut(idx).update(taken);
    }
}

/// Shifts an outcome into a history register that indexes a table of
/// `entries` counters.
///
/// The register doubles (plus one when taken) and, if the result reaches
/// `entries`, `entries` is subtracted once. For a register already below
/// `entries` this keeps the result in `[0, entries)` for any table size,
/// including sizes that are not a power of two.
#[inline]
pub const fn shift_history(history: u64, taken: bool, entries: u64) -> u64 {
    let shifted = history * 2 + taken as u64;
    if shifted >= entries {
        shifted - entries
    } else {
        shifted
    }
}
