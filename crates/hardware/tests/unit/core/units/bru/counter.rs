//! Saturating Counter and Pattern History Table Tests.
//!
//! Verifies the 2-bit transition law, the initial state of new tables, and
//! the single-subtraction history shift shared by the local and gshare
//! predictors.

use proptest::prelude::*;
use rstest::rstest;

use predsim_core::common::ConfigError;
use predsim_core::core::units::bru::counter::{
    PatternHistoryTable, SaturatingCounter, shift_history,
};

// ══════════════════════════════════════════════════════════
// 1. SaturatingCounter
// ══════════════════════════════════════════════════════════

#[test]
fn from_bits_rejects_out_of_range_states() {
    for bits in 0..=3 {
        assert_eq!(SaturatingCounter::from_bits(bits).map(SaturatingCounter::bits), Some(bits));
    }
    assert_eq!(SaturatingCounter::from_bits(4), None);
}

#[test]
fn counters_start_strongly_taken() {
    assert_eq!(SaturatingCounter::default(), SaturatingCounter::STRONG_TAKEN);
}

#[test]
fn upper_half_predicts_taken() {
    assert!(SaturatingCounter::STRONG_TAKEN.is_taken());
    assert!(SaturatingCounter::WEAK_TAKEN.is_taken());
    assert!(!SaturatingCounter::WEAK_NOT_TAKEN.is_taken());
    assert!(!SaturatingCounter::STRONG_NOT_TAKEN.is_taken());
}

/// From any state, four identical outcomes reach the matching extreme.
#[rstest]
fn four_outcomes_saturate(#[values(0, 1, 2, 3)] start: u8, #[values(true, false)] taken: bool) {
    let mut c = SaturatingCounter::from_bits(start).unwrap();
    for _ in 0..4 {
        c.update(taken);
    }
    let extreme = if taken {
        SaturatingCounter::STRONG_TAKEN
    } else {
        SaturatingCounter::STRONG_NOT_TAKEN
    };
    assert_eq!(c, extreme);
}

#[test]
fn single_step_transitions() {
    let step = |bits: u8, taken: bool| {
        let mut c = SaturatingCounter::from_bits(bits).unwrap();
        c.update(taken);
        c.bits()
    };
    assert_eq!(step(0b11, true), 0b11);
    assert_eq!(step(0b11, false), 0b10);
    assert_eq!(step(0b10, true), 0b11);
    assert_eq!(step(0b10, false), 0b01);
    assert_eq!(step(0b01, true), 0b10);
    assert_eq!(step(0b01, false), 0b00);
    assert_eq!(step(0b00, true), 0b01);
    assert_eq!(step(0b00, false), 0b00);
}

proptest! {
    /// Counters never leave {00, 01, 10, 11}.
    #[test]
    fn counter_stays_in_range(start in 0u8..4, outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut c = SaturatingCounter::from_bits(start).unwrap();
        for taken in outcomes {
            c.update(taken);
            prop_assert!(c.bits() <= 3);
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. PatternHistoryTable
// ══════════════════════════════════════════════════════════

#[test]
fn zero_entry_table_is_rejected() {
    assert_eq!(PatternHistoryTable::new(0).unwrap_err(), ConfigError::ZeroEntries);
}

/// A size that cannot be allocated is an error, not a crash.
#[test]
fn oversized_table_is_rejected() {
    assert_eq!(
        PatternHistoryTable::new(u64::MAX).unwrap_err(),
        ConfigError::TableTooLarge(u64::MAX)
    );
}

#[test]
fn new_table_predicts_taken_everywhere() {
    let pht = PatternHistoryTable::new(1000).unwrap();
    assert_eq!(pht.len(), 1000);
    assert!(!pht.is_empty());
    assert!((0..1000).all(|i| pht.predict(i)));
}

#[test]
fn update_touches_only_its_index() {
    let mut pht = PatternHistoryTable::new(8).unwrap();
    pht.update(3, false);
    pht.update(3, false);
    assert!(!pht.predict(3));
    assert_eq!(pht.get(3), SaturatingCounter::WEAK_NOT_TAKEN);
    assert_eq!(pht.get(2), SaturatingCounter::STRONG_TAKEN);
    assert_eq!(pht.get(4), SaturatingCounter::STRONG_TAKEN);
}

// ══════════════════════════════════════════════════════════
// 3. History shift
// ══════════════════════════════════════════════════════════

#[test]
fn shift_appends_outcome() {
    assert_eq!(shift_history(0, true, 1024), 1);
    assert_eq!(shift_history(1, false, 1024), 2);
    assert_eq!(shift_history(5, true, 1024), 11);
}

#[test]
fn shift_subtracts_once_on_overflow() {
    assert_eq!(shift_history(512, false, 1024), 0);
    assert_eq!(shift_history(1023, true, 1024), 1023);
    assert_eq!(shift_history(600, true, 1000), 201);
}

proptest! {
    /// A register below `entries` stays below `entries`.
    #[test]
    fn shift_stays_in_table(entries in 1u64..=4096, seed in any::<u64>(), taken in any::<bool>()) {
        let history = seed % entries;
        prop_assert!(shift_history(history, taken, entries) < entries);
    }
}
