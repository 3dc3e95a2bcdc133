//! Hardware Prefetcher implementations.
//!
//! This module contains the interface and implementations of the data cache
//! prefetchers. A prefetcher is consulted only on a demand miss: the driver
//! first calls [`Prefetcher::prefetch`], which may install speculative lines
//! through [`Cache::prefetch_fill_line`], and then [`Prefetcher::train`],
//! which updates the learned tables with the same access.

/// Shared Reference Prediction Table storage with random replacement.
pub mod rpt;

/// Next-N-line prefetcher (prefetches sequential blocks).
pub mod next_line;

/// Stride prefetcher (per-PC constant-stride detection).
pub mod stride;

/// Distance prefetcher (global miss-distance correlation).
pub mod distance;

pub use self::distance::DistancePrefetcher;
pub use self::next_line::NextLinePrefetcher;
pub use self::stride::StridePrefetcher;

use crate::common::ConfigError;
use crate::config::{CacheConfig, PrefetcherKind};
use crate::core::units::cache::Cache;

/// Trait for cache prefetcher implementations.
pub trait Prefetcher {
    /// Issues speculative fills for a demand miss.
    ///
    /// Every candidate block is filled only if it is not already resident,
    /// checked with [`Cache::exists`] so the LRU order is left untouched.
    ///
    /// # Arguments
    ///
    /// * `cache` - The cache to fill
    /// * `addr` - The missing address
    /// * `pc` - Program counter of the load instruction
    ///
    /// # Returns
    ///
    /// The number of blocks installed.
    fn prefetch(&mut self, cache: &mut Cache, addr: u64, pc: u64) -> u64;

    /// Updates the prefetcher's learned state with the missing access.
    ///
    /// Always called after [`Prefetcher::prefetch`] for the same access.
    fn train(&mut self, addr: u64, pc: u64);
}

/// Installs `target` as a prefetched line unless it is already resident.
///
/// Returns `true` if a fill was issued.
#[inline]
pub(crate) fn fill_if_absent(cache: &mut Cache, target: u64) -> bool {
    if cache.exists(target) {
        false
    } else {
        cache.prefetch_fill_line(target);
        true
    }
}

/// Enum wrapper for static dispatch of prefetchers.
#[derive(Debug, Clone)]
pub enum PrefetcherWrapper {
    /// No prefetching.
    None,
    /// Next-N-line prefetcher.
    NextLine(NextLinePrefetcher),
    /// Stride RPT prefetcher.
    Stride(StridePrefetcher),
    /// Distance RPT prefetcher.
    Distance(DistancePrefetcher),
}

impl PrefetcherWrapper {
    /// Creates the prefetcher variant `kind`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Prefetcher variant
    /// * `block_bytes` - Cache block size in bytes
    /// * `aggression` - Blocks (or distances) issued per trigger
    /// * `seed` - Seed for RPT random replacement
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroAggression`] if a prefetching variant is
    /// requested with zero aggression.
    pub fn new(
        kind: PrefetcherKind,
        block_bytes: u64,
        aggression: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if aggression == 0 && kind != PrefetcherKind::None {
            return Err(ConfigError::ZeroAggression(kind.as_str()));
        }
        let pf = match kind {
            PrefetcherKind::None => Self::None,
            PrefetcherKind::NextNLines => {
                Self::NextLine(NextLinePrefetcher::new(block_bytes, aggression))
            }
            PrefetcherKind::Stride => {
                Self::Stride(StridePrefetcher::new(block_bytes, aggression, seed))
            }
            PrefetcherKind::Distance => Self::Distance(DistancePrefetcher::new(aggression, seed)),
        };
        tracing::debug!(prefetcher = %kind, aggression, seed, "prefetcher created");
        Ok(pf)
    }

    /// Creates the prefetcher described by a [`CacheConfig`].
    ///
    /// # Errors
    ///
    /// See [`PrefetcherWrapper::new`].
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.prefetcher,
            config.block_bytes as u64,
            config.aggression,
            config.seed,
        )
    }

    /// Returns the variant of this prefetcher.
    pub const fn kind(&self) -> PrefetcherKind {
        match self {
            Self::None => PrefetcherKind::None,
            Self::NextLine(_) => PrefetcherKind::NextNLines,
            Self::Stride(_) => PrefetcherKind::Stride,
            Self::Distance(_) => PrefetcherKind::Distance,
        }
    }
}

impl Prefetcher for PrefetcherWrapper {
    #[inline(always)]
    fn prefetch(&mut self, cache: &mut Cache, addr: u64, pc: u64) -> u64 {
        match self {
            Self::None => 0,
            Self::NextLine(pf) => pf.prefetch(cache, addr, pc),
            Self::Stride(pf) => pf.prefetch(cache, addr, pc),
            Self::Distance(pf) => pf.prefetch(cache, addr, pc),
        }
    }

    #[inline(always)]
    fn train(&mut self, addr: u64, pc: u64) {
        match self {
            Self::None => {}
            Self::NextLine(pf) => pf.train(addr, pc),
            Self::Stride(pf) => pf.train(addr, pc),
            Self::Distance(pf) => pf.train(addr, pc),
        }
    }
}
