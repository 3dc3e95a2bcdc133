//! Set-Associative Cache Simulator.
//!
//! This module implements a set-associative cache with LRU replacement and
//! two fill paths: demand fills from the simulation driver and speculative
//! fills from a prefetcher. Lines installed by a prefetch are tracked until
//! their first demand hit so the number of useful prefetches can be reported.
//!
//! Addresses are split as:
//!
//! - `block = addr / block_bytes`
//! - `set   = block % num_sets`
//! - `tag   = block / num_sets`
//!
//! None of the three geometry parameters needs to be a power of two.

use crate::common::ConfigError;

/// Cache line entry containing tag, validity, recency and prefetch credit.
#[derive(Debug, Clone, Copy)]
struct CacheLine {
    tag: u64,
    valid: bool,
    /// Recency rank within the set: 0 is MRU, `ways - 1` is LRU.
    rank: usize,
    /// Installed by a prefetch and not yet credited by a demand hit.
    prefetched: bool,
}

/// One set of `ways` lines.
///
/// The ranks of the lines are always a permutation of `0..ways`. Invalid
/// lines are never promoted, so they always hold the highest ranks and the
/// LRU victim is an invalid line whenever one exists.
#[derive(Debug, Clone)]
struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Builds an empty set, or `None` if its lines cannot be allocated.
    fn new(ways: usize) -> Option<Self> {
        let mut lines = Vec::new();
        lines.try_reserve_exact(ways).ok()?;
        lines.extend((0..ways).map(|rank| CacheLine {
            tag: 0,
            valid: false,
            rank,
            prefetched: false,
        }));
        Some(Self { lines })
    }

    /// Builds `num_sets` empty sets of `ways` lines each.
    fn allocate(num_sets: usize, ways: usize) -> Result<Vec<Self>, ConfigError> {
        let too_large = || ConfigError::TableTooLarge((num_sets as u64).saturating_mul(ways as u64));
        if num_sets.checked_mul(ways).is_none() {
            return Err(too_large());
        }
        let mut sets = Vec::new();
        sets.try_reserve_exact(num_sets).map_err(|_| too_large())?;
        for _ in 0..num_sets {
            sets.push(Self::new(ways).ok_or_else(too_large)?);
        }
        Ok(sets)
    }

    fn find(&self, tag: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Promotes `way` to MRU, ageing every line that was more recent.
    fn touch(&mut self, way: usize) {
        let old = self.lines[way].rank;
        for line in &mut self.lines {
            if line.rank < old {
                line.rank += 1;
            }
        }
        self.lines[way].rank = 0;
    }

    fn victim(&self) -> usize {
        let lru = self.lines.len() - 1;
        self.lines
            .iter()
            .position(|line| line.rank == lru)
            .unwrap_or(0)
    }

    /// Installs `tag` in the LRU way and promotes it to MRU.
    fn install(&mut self, tag: u64, prefetched: bool) {
        let way = self.victim();
        let line = &mut self.lines[way];
        line.tag = tag;
        line.valid = true;
        line.prefetched = prefetched;
        self.touch(way);
    }
}

/// Set-associative LRU cache with separate demand and prefetch fill paths.
#[derive(Debug, Clone)]
pub struct Cache {
    sets: Vec<CacheSet>,
    num_sets: u64,
    ways: usize,
    block_bytes: u64,
    successful_prefetches: u64,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `num_sets` - Number of sets
    /// * `ways` - Associativity (1 for direct mapped)
    /// * `block_bytes` - Block size in bytes
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSets`], [`ConfigError::ZeroAssociativity`]
    /// or [`ConfigError::ZeroBlockSize`] if the matching parameter is zero,
    /// and [`ConfigError::TableTooLarge`] if the lines cannot be allocated.
    pub fn new(num_sets: usize, ways: usize, block_bytes: usize) -> Result<Self, ConfigError> {
        if num_sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if block_bytes == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        let sets = CacheSet::allocate(num_sets, ways)?;
        tracing::debug!(num_sets, ways, block_bytes, "cache created");
        Ok(Self {
            sets,
            num_sets: num_sets as u64,
            ways,
            block_bytes: block_bytes as u64,
            successful_prefetches: 0,
        })
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> u64 {
        self.num_sets
    }

    /// Associativity.
    pub const fn associativity(&self) -> usize {
        self.ways
    }

    /// Block size in bytes.
    pub const fn block_size(&self) -> u64 {
        self.block_bytes
    }

    /// Splits `addr` into its set index and tag.
    #[inline]
    const fn locate(&self, addr: u64) -> (usize, u64) {
        let block = addr / self.block_bytes;
        ((block % self.num_sets) as usize, block / self.num_sets)
    }

    /// Probes the cache on behalf of a demand access.
    ///
    /// On a hit the line becomes MRU and, if it was installed by a prefetch
    /// that has not been credited yet, the successful-prefetch count is
    /// incremented and the credit consumed. A miss changes nothing.
    ///
    /// # Returns
    ///
    /// `true` if the block holding `addr` is resident.
    pub fn probe_tag(&mut self, addr: u64) -> bool {
        let (set_index, tag) = self.locate(addr);
        let set = &mut self.sets[set_index];
        let Some(way) = set.find(tag) else {
            return false;
        };
        if set.lines[way].prefetched {
            set.lines[way].prefetched = false;
            self.successful_prefetches += 1;
        }
        set.touch(way);
        true
    }

    /// Checks presence of the block holding `addr` without touching
    /// recency or prefetch credit.
    pub fn exists(&self, addr: u64) -> bool {
        let (set_index, tag) = self.locate(addr);
        self.sets[set_index].find(tag).is_some()
    }

    /// Demand fill: installs the block as MRU, evicting the LRU line of a
    /// full set. A resident block is refreshed to MRU and loses any pending
    /// prefetch credit.
    pub fn fill_line(&mut self, addr: u64) {
        let (set_index, tag) = self.locate(addr);
        let set = &mut self.sets[set_index];
        match set.find(tag) {
            Some(way) => {
                set.lines[way].prefetched = false;
                set.touch(way);
            }
            None => set.install(tag, false),
        }
    }

    /// Prefetch fill: installs the block as MRU and marks it as prefetched.
    /// A resident block only has its recency refreshed.
    pub fn prefetch_fill_line(&mut self, addr: u64) {
        let (set_index, tag) = self.locate(addr);
        let set = &mut self.sets[set_index];
        match set.find(tag) {
            Some(way) => set.touch(way),
            None => set.install(tag, true),
        }
    }

    /// Number of prefetched lines that were later consumed by a demand hit.
    pub const fn successful_prefetch_count(&self) -> u64 {
        self.successful_prefetches
    }
}
