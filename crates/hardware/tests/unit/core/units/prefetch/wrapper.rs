//! Prefetcher Wrapper Tests.
//!
//! Verifies construction of every prefetcher variant from its kind or a
//! cache configuration, and that the enum dispatches to the right model.

use rstest::rstest;

use crate::common::cache;
use predsim_core::common::ConfigError;
use predsim_core::config::{CacheConfig, PrefetcherKind};
use predsim_core::core::units::prefetch::{Prefetcher, PrefetcherWrapper};

#[rstest]
#[case(PrefetcherKind::None)]
#[case(PrefetcherKind::NextNLines)]
#[case(PrefetcherKind::Stride)]
#[case(PrefetcherKind::Distance)]
fn builds_every_variant(#[case] kind: PrefetcherKind) {
    let pf = PrefetcherWrapper::new(kind, 4, 2, 0).unwrap();
    assert_eq!(pf.kind(), kind);
}

#[rstest]
#[case(PrefetcherKind::NextNLines)]
#[case(PrefetcherKind::Stride)]
#[case(PrefetcherKind::Distance)]
fn zero_aggression_is_rejected(#[case] kind: PrefetcherKind) {
    assert_eq!(
        PrefetcherWrapper::new(kind, 4, 0, 0).unwrap_err(),
        ConfigError::ZeroAggression(kind.as_str())
    );
}

#[test]
fn none_accepts_zero_aggression() {
    assert!(PrefetcherWrapper::new(PrefetcherKind::None, 4, 0, 0).is_ok());
}

#[test]
fn none_never_prefetches() {
    let mut c = cache(64, 2, 4);
    let mut pf = PrefetcherWrapper::new(PrefetcherKind::None, 4, 2, 0).unwrap();
    for addr in (0..64).map(|i| i * 4) {
        assert_eq!(pf.prefetch(&mut c, addr, 0), 0);
        pf.train(addr, 0);
    }
}

/// Next-N-line built from a config uses its block size and aggression.
#[test]
fn from_config_uses_cache_geometry() {
    let config = CacheConfig {
        block_bytes: 16,
        prefetcher: PrefetcherKind::NextNLines,
        aggression: 3,
        ..CacheConfig::default()
    };
    let mut c = cache(64, 2, 16);
    let mut pf = PrefetcherWrapper::from_config(&config).unwrap();
    assert_eq!(pf.prefetch(&mut c, 0x100, 0), 3);
    assert!(c.exists(0x110));
    assert!(c.exists(0x130));
    assert!(!c.exists(0x140));
}
