//! Next-N-Line Prefetcher Tests.
//!
//! Verifies that the next-N-line prefetcher fills the `aggression` blocks
//! after a miss, skips resident blocks, and never disturbs the LRU order
//! of lines it does not install.

use rstest::rstest;

use crate::common::cache;
use predsim_core::core::units::prefetch::{NextLinePrefetcher, Prefetcher};

// ══════════════════════════════════════════════════════════
// 1. Basic operation
// ══════════════════════════════════════════════════════════

/// Aggression N fills exactly the N following blocks.
#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn fills_next_n_blocks(#[case] aggression: usize) {
    let mut c = cache(64, 2, 4);
    let mut pf = NextLinePrefetcher::new(4, aggression);
    assert_eq!(pf.prefetch(&mut c, 0x100, 0), aggression as u64);
    for i in 1..=aggression as u64 {
        assert!(c.exists(0x100 + 4 * i));
    }
    assert!(!c.exists(0x100 + 4 * (aggression as u64 + 1)));
    assert!(!c.exists(0x100), "the missing block itself is not prefetched");
}

/// Resident blocks are skipped and not counted.
#[test]
fn skips_resident_blocks() {
    let mut c = cache(64, 2, 4);
    c.fill_line(0x108);
    let mut pf = NextLinePrefetcher::new(4, 3);
    assert_eq!(pf.prefetch(&mut c, 0x100, 0), 2);
    assert_eq!(pf.prefetch(&mut c, 0x100, 0), 0);
}

/// Offsets are added to the raw address, not to its block base.
#[test]
fn offsets_are_not_block_aligned() {
    let mut c = cache(64, 2, 16);
    let mut pf = NextLinePrefetcher::new(16, 1);
    assert_eq!(pf.prefetch(&mut c, 0x10F, 0), 1);
    // 0x10F + 16 = 0x11F, still inside block 0x110.
    assert!(c.exists(0x110));
    assert!(!c.exists(0x120));
}

/// Training has no effect on what is prefetched.
#[test]
fn training_is_stateless() {
    let mut a = cache(64, 2, 4);
    let mut b = cache(64, 2, 4);
    let mut trained = NextLinePrefetcher::new(4, 2);
    let mut fresh = NextLinePrefetcher::new(4, 2);
    for addr in [0x40, 0x80, 0xC0] {
        trained.train(addr, 0x400);
    }
    assert_eq!(
        trained.prefetch(&mut a, 0x200, 0x400),
        fresh.prefetch(&mut b, 0x200, 0x400)
    );
}

// ══════════════════════════════════════════════════════════
// 2. Interaction with LRU
// ══════════════════════════════════════════════════════════

/// Checking a resident candidate does not promote it.
#[test]
fn resident_candidate_keeps_its_rank() {
    // 1 set, 2 ways: every block competes for the same two lines.
    let mut c = cache(1, 2, 4);
    c.fill_line(0x04);
    c.fill_line(0x40);
    let mut pf = NextLinePrefetcher::new(4, 1);
    assert_eq!(pf.prefetch(&mut c, 0x00, 0), 0, "0x04 already resident");
    c.fill_line(0x80);
    assert!(!c.exists(0x04), "0x04 stayed LRU and was evicted");
}

/// Address arithmetic wraps at the top of the address space.
#[test]
fn wraps_at_address_space_end() {
    let mut c = cache(64, 2, 4);
    let mut pf = NextLinePrefetcher::new(4, 1);
    assert_eq!(pf.prefetch(&mut c, u64::MAX - 1, 0), 1);
    assert!(c.exists(2));
}
