//! Memory simulation driver.
//!
//! Loads probe the cache; a miss fills the block, lets the prefetcher issue
//! speculative fills and then trains it on the same access. Stores probe and
//! fill but never involve the prefetcher.
//!
//! A checkpoint report is produced every `checkpoint_interval` accesses and
//! the run stops after `access_limit` accesses.

use super::{Step, crosses, reaches, trace::TraceEvent};
use crate::common::ConfigError;
use crate::config::{Config, GeneralConfig};
use crate::core::units::cache::Cache;
use crate::core::units::prefetch::{Prefetcher, PrefetcherWrapper};
use crate::stats::{MemoryReport, MemoryStats};

/// Drives one cache and its prefetcher over an access stream.
#[derive(Debug, Clone)]
pub struct MemorySimulation {
    cache: Cache,
    prefetcher: PrefetcherWrapper,
    stats: MemoryStats,
    checkpoint_interval: u64,
    access_limit: u64,
    stopped: bool,
}

impl MemorySimulation {
    /// Builds the cache, prefetcher and limits described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] of the general or cache section.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.general.validate()?;
        config.cache.validate()?;
        let cache = Cache::new(
            config.cache.sets,
            config.cache.ways,
            config.cache.block_bytes,
        )?;
        let prefetcher = PrefetcherWrapper::from_config(&config.cache)?;
        Ok(Self::with_parts(cache, prefetcher, &config.general))
    }

    /// Wraps an already-built cache and prefetcher.
    pub fn with_parts(cache: Cache, prefetcher: PrefetcherWrapper, general: &GeneralConfig) -> Self {
        Self {
            cache,
            prefetcher,
            stats: MemoryStats::default(),
            checkpoint_interval: general.checkpoint_interval,
            access_limit: general.access_limit,
            stopped: false,
        }
    }

    /// Simulates a load of `addr` issued by the instruction at `pc`.
    pub fn load(&mut self, addr: u64, pc: u64) -> Step<MemoryReport> {
        if self.stopped {
            return Step::Stop(self.report());
        }
        self.stats.loads += 1;
        if self.cache.probe_tag(addr) {
            self.stats.hits += 1;
        } else {
            self.cache.fill_line(addr);
            self.stats.prefetches += self.prefetcher.prefetch(&mut self.cache, addr, pc);
            self.prefetcher.train(addr, pc);
        }
        self.count_access()
    }

    /// Simulates a store to `addr`. The prefetcher is neither triggered nor
    /// trained.
    pub fn store(&mut self, addr: u64, _pc: u64) -> Step<MemoryReport> {
        if self.stopped {
            return Step::Stop(self.report());
        }
        self.stats.stores += 1;
        if self.cache.probe_tag(addr) {
            self.stats.hits += 1;
        } else {
            self.cache.fill_line(addr);
        }
        self.count_access()
    }

    /// Feeds a decoded trace event. Branch and instruction events carry no
    /// memory access and are ignored.
    pub fn on_event(&mut self, event: TraceEvent) -> Step<MemoryReport> {
        match event {
            TraceEvent::Load { addr, pc } => self.load(addr, pc),
            TraceEvent::Store { addr, pc } => self.store(addr, pc),
            TraceEvent::Branch { .. } | TraceEvent::Instructions(_) => Step::Continue,
        }
    }

    fn count_access(&mut self) -> Step<MemoryReport> {
        let prev = self.stats.accesses;
        self.stats.accesses += 1;
        let next = self.stats.accesses;

        if reaches(prev, next, self.access_limit) {
            self.stopped = true;
            tracing::warn!(accesses = next, "access limit reached");
            return Step::Stop(self.report());
        }
        if crosses(prev, next, self.checkpoint_interval) {
            tracing::info!(
                accesses = next,
                hits = self.stats.hits,
                prefetches = self.stats.prefetches,
                "checkpoint"
            );
            return Step::Checkpoint(self.report());
        }
        Step::Continue
    }

    /// Current counters, including the cache's successful-prefetch count.
    pub const fn stats(&self) -> MemoryStats {
        let mut stats = self.stats;
        stats.successful_prefetches = self.cache.successful_prefetch_count();
        stats
    }

    /// Snapshot of the counters as a printable report.
    pub const fn report(&self) -> MemoryReport {
        MemoryReport(self.stats())
    }

    /// The simulated cache.
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The prefetcher being driven.
    pub const fn prefetcher(&self) -> &PrefetcherWrapper {
        &self.prefetcher
    }

    /// Returns `true` once the access limit has been reached.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}
