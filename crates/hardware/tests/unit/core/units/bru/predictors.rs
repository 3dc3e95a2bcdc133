//! Branch Predictor Direction Tests.
//!
//! Verifies the direction prediction and training logic for all four
//! branch predictor implementations: AlwaysTaken, Local, GShare, and
//! Tournament, plus the enum wrapper that dispatches between them.

use proptest::prelude::*;
use rstest::rstest;

use predsim_core::common::ConfigError;
use predsim_core::config::{BranchConfig, BranchPredictorKind};
use predsim_core::core::units::bru::gshare::GSharePredictor;
use predsim_core::core::units::bru::local::LocalPredictor;
use predsim_core::core::units::bru::static_bp::AlwaysTakenPredictor;
use predsim_core::core::units::bru::tournament::TournamentPredictor;
use predsim_core::core::units::bru::{BranchPredictor, BranchPredictorWrapper};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

/// Train a predictor by feeding `n` iterations of the same branch outcome.
fn train<P: BranchPredictor>(bp: &mut P, pc: u64, taken: bool, n: usize) {
    for _ in 0..n {
        bp.train(pc, taken);
    }
}

/// Feeds `pattern` repeatedly and counts correct predictions over the last
/// `measure` branches.
fn accuracy_on<P: BranchPredictor>(
    bp: &mut P,
    pc: u64,
    pattern: &[bool],
    warmup: usize,
    measure: usize,
) -> usize {
    let mut correct = 0;
    for (i, &taken) in pattern.iter().cycle().take(warmup + measure).enumerate() {
        if i >= warmup && bp.predict(pc) == taken {
            correct += 1;
        }
        bp.train(pc, taken);
    }
    correct
}

// ══════════════════════════════════════════════════════════
// 1. AlwaysTaken
// ══════════════════════════════════════════════════════════

/// Always-taken predictor stays taken regardless of training.
#[test]
fn always_taken_ignores_training() {
    let mut bp = AlwaysTakenPredictor::new(1024);
    train(&mut bp, 0x400, false, 100);
    assert!(bp.predict(0x400));
    assert!(bp.predict(0));
}

// ══════════════════════════════════════════════════════════
// 2. Local
// ══════════════════════════════════════════════════════════

/// An always-taken branch is predicted taken within two trainings and
/// stays that way.
#[test]
fn local_converges_on_always_taken() {
    let mut bp = LocalPredictor::new(1024).unwrap();
    let pc = 0x4000_1234;
    train(&mut bp, pc, true, 2);
    for _ in 0..1000 {
        assert!(bp.predict(pc));
        bp.train(pc, true);
    }
}

/// An alternating branch settles on two history values and becomes fully
/// predictable.
#[test]
fn local_learns_alternating_pattern() {
    let mut bp = LocalPredictor::new(1024).unwrap();
    let correct = accuracy_on(&mut bp, 0x80, &[true, false], 40, 100);
    assert_eq!(correct, 100);
}

/// The history register only keeps values that index the table.
#[test]
fn local_history_stays_in_table() {
    let mut bp = LocalPredictor::new(1000).unwrap();
    for i in 0..5000u64 {
        bp.train(7, i % 3 != 0);
        assert!(bp.history(7) < 1000);
    }
}

/// Training moves the counter addressed by the history, not by the PC.
#[test]
fn local_trains_counter_at_history_index() {
    let mut bp = LocalPredictor::new(16).unwrap();
    bp.train(5, false);
    assert_eq!(bp.pht().len(), 16);
    assert_eq!(bp.pht().get(0).bits(), 0b10);
    assert_eq!(bp.pht().get(5).bits(), 0b11);
    assert_eq!(bp.history(5), 0);
}

/// Branches in different history registers do not disturb each other's
/// history.
#[test]
fn local_histories_are_per_register() {
    let mut bp = LocalPredictor::new(1024).unwrap();
    train(&mut bp, 1, true, 3);
    assert_eq!(bp.history(1), 7);
    assert_eq!(bp.history(2), 0);
}

// ══════════════════════════════════════════════════════════
// 3. GShare
// ══════════════════════════════════════════════════════════

/// GShare starts out predicting taken everywhere.
#[test]
fn gshare_initially_taken() {
    let bp = GSharePredictor::new(1024).unwrap();
    assert!((0..64).all(|pc| bp.predict(pc)));
    assert_eq!(bp.history(), 0);
}

/// Every outcome is shifted into the single global register.
#[test]
fn gshare_history_is_global() {
    let mut bp = GSharePredictor::new(1024).unwrap();
    bp.train(0x10, true);
    bp.train(0x20, false);
    bp.train(0x30, true);
    assert_eq!(bp.history(), 0b101);
}

/// One not-taken outcome weakens a strongly-taken counter without flipping
/// it.
#[test]
fn gshare_needs_two_misses_to_flip() {
    let mut bp = GSharePredictor::new(1024).unwrap();
    // With the history held at zero the same counter is trained each time.
    bp.train(0, false);
    assert_eq!(bp.history(), 0);
    assert!(bp.predict(0));
    bp.train(0, false);
    assert!(!bp.predict(0));
}

proptest! {
    /// The global history never exceeds `entries - 1`, including for a
    /// table size that is not a power of two.
    #[test]
    fn gshare_history_bounded(
        entries in prop::sample::select(vec![1000u64, 1024]),
        branches in prop::collection::vec((any::<u64>(), any::<bool>()), 1..256),
    ) {
        let mut bp = GSharePredictor::new(entries).unwrap();
        for (pc, taken) in branches {
            let _ = bp.predict(pc);
            bp.train(pc, taken);
            prop_assert!(bp.history() < entries);
        }
    }
}

// ══════════════════════════════════════════════════════════
// 4. Tournament
// ══════════════════════════════════════════════════════════

/// With every selector in `11`, the tournament follows gshare.
#[test]
fn tournament_starts_on_gshare() {
    let bp = TournamentPredictor::new(1024).unwrap();
    assert!(bp.selector(0x77).is_taken());
    assert_eq!(bp.predict(0x77), bp.gshare().predict(0x77));
}

/// Both components are trained on every branch.
#[test]
fn tournament_trains_both_components() {
    let mut bp = TournamentPredictor::new(1024).unwrap();
    bp.train(3, true);
    bp.train(3, true);
    assert_eq!(bp.local().history(3), 3);
    assert_eq!(bp.gshare().history(), 3);
}

proptest! {
    /// The tournament output equals gshare's when the selector is `10` or
    /// `11` and local's otherwise.
    #[test]
    fn tournament_follows_selector(
        branches in prop::collection::vec((0u64..64, any::<bool>()), 0..512),
        probe in 0u64..64,
    ) {
        let mut bp = TournamentPredictor::new(256).unwrap();
        for (pc, taken) in branches {
            bp.train(pc, taken);
        }
        let expected = if bp.selector(probe).is_taken() {
            bp.gshare().predict(probe)
        } else {
            bp.local().predict(probe)
        };
        prop_assert_eq!(bp.predict(probe), expected);
    }
}

// ══════════════════════════════════════════════════════════
// 5. Wrapper
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(BranchPredictorKind::AlwaysTaken)]
#[case(BranchPredictorKind::Local)]
#[case(BranchPredictorKind::Gshare)]
#[case(BranchPredictorKind::Tournament)]
fn wrapper_builds_every_variant(#[case] kind: BranchPredictorKind) {
    let bp = BranchPredictorWrapper::new(kind, 1024).unwrap();
    assert_eq!(bp.kind(), kind);
    assert!(bp.predict(0x1000), "fresh tables predict taken");
}

#[rstest]
#[case(BranchPredictorKind::Local)]
#[case(BranchPredictorKind::Gshare)]
#[case(BranchPredictorKind::Tournament)]
fn wrapper_rejects_empty_tables(#[case] kind: BranchPredictorKind) {
    assert_eq!(
        BranchPredictorWrapper::new(kind, 0).unwrap_err(),
        ConfigError::ZeroEntries
    );
}

#[rstest]
#[case(BranchPredictorKind::Local)]
#[case(BranchPredictorKind::Gshare)]
#[case(BranchPredictorKind::Tournament)]
fn wrapper_rejects_oversized_tables(#[case] kind: BranchPredictorKind) {
    assert_eq!(
        BranchPredictorWrapper::new(kind, u64::MAX).unwrap_err(),
        ConfigError::TableTooLarge(u64::MAX)
    );
}

#[test]
fn wrapper_from_config() {
    let config = BranchConfig {
        predictor: BranchPredictorKind::Gshare,
        entries: 512,
    };
    let bp = BranchPredictorWrapper::from_config(&config).unwrap();
    assert_eq!(bp.kind(), BranchPredictorKind::Gshare);
    assert!(BranchPredictorWrapper::new(BranchPredictorKind::AlwaysTaken, 0).is_ok());
}

/// The wrapper behaves exactly like the predictor it holds.
#[test]
fn wrapper_matches_inner_predictor() {
    let mut wrapped = BranchPredictorWrapper::new(BranchPredictorKind::Local, 1024).unwrap();
    let mut plain = LocalPredictor::new(1024).unwrap();
    for i in 0..500u64 {
        let pc = i % 13;
        let taken = (i * 7) % 5 < 2;
        assert_eq!(wrapped.predict(pc), plain.predict(pc));
        wrapped.train(pc, taken);
        plain.train(pc, taken);
    }
}
