//! Configuration system for the predictor simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline table sizes, cache geometry and reporting intervals.
//! 2. **Structures:** Hierarchical config for general, branch and cache settings.
//! 3. **Enums:** Branch predictor and prefetcher variants, parsed from their tool names.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built with
//! `Config::default()` and overridden field by field from the CLI.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
///
/// Used both by `Default` impls and by serde for missing fields.
mod defaults {
    /// Default pattern history table size (1024 entries).
    pub const BP_ENTRIES: u64 = 1024;

    /// Default number of cache sets.
    pub const CACHE_SETS: usize = 64;

    /// Default cache associativity (2-way).
    pub const CACHE_WAYS: usize = 2;

    /// Default cache block size in bytes.
    pub const CACHE_BLOCK: usize = 4;

    /// Default prefetch aggression (lines or distances per trigger).
    pub const AGGRESSION: usize = 2;

    /// Default seed for RPT victim selection.
    pub const SEED: u64 = 0;

    /// Instructions between heartbeat log lines (100M).
    pub const HEARTBEAT_INTERVAL: u64 = 100_000_000;

    /// Instructions after which a branch simulation stops (1B).
    pub const STOP_AFTER: u64 = 1_000_000_000;

    /// Memory accesses between checkpoint reports (100M).
    pub const CHECKPOINT_INTERVAL: u64 = 100_000_000;

    /// Memory accesses after which a cache simulation stops (2B).
    pub const ACCESS_LIMIT: u64 = 2_000_000_000;
}

/// Branch direction predictor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchPredictorKind {
    /// Always predicts taken; keeps no state.
    #[default]
    AlwaysTaken,
    /// Per-PC local history feeding a pattern history table.
    Local,
    /// Global history XOR PC indexing a pattern history table.
    Gshare,
    /// Selector choosing between a local and a gshare predictor.
    Tournament,
}

impl BranchPredictorKind {
    /// Accepted names, in declaration order.
    pub const NAMES: &'static str = "always_taken, local, gshare, tournament";

    /// Returns the tool name of this variant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysTaken => "always_taken",
            Self::Local => "local",
            Self::Gshare => "gshare",
            Self::Tournament => "tournament",
        }
    }
}

impl fmt::Display for BranchPredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchPredictorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always_taken" => Ok(Self::AlwaysTaken),
            "local" => Ok(Self::Local),
            "gshare" => Ok(Self::Gshare),
            "tournament" => Ok(Self::Tournament),
            other => Err(ConfigError::UnknownVariant {
                kind: "branch predictor",
                name: other.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Hardware prefetcher variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefetcherKind {
    /// No prefetching.
    #[default]
    None,
    /// Prefetches the next `aggression` sequential blocks on every miss.
    NextNLines,
    /// Per-PC stride detection in a Reference Prediction Table.
    Stride,
    /// Global miss-distance correlation in a Reference Prediction Table.
    Distance,
}

impl PrefetcherKind {
    /// Accepted names, in declaration order.
    pub const NAMES: &'static str = "none, next_n_lines, stride, distance";

    /// Returns the tool name of this variant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NextNLines => "next_n_lines",
            Self::Stride => "stride",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for PrefetcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrefetcherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "next_n_lines" => Ok(Self::NextNLines),
            "stride" => Ok(Self::Stride),
            "distance" => Ok(Self::Distance),
            other => Err(ConfigError::UnknownVariant {
                kind: "prefetcher",
                name: other.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use predsim_core::config::{BranchPredictorKind, Config, PrefetcherKind};
///
/// let json = r#"{
///     "branch": { "predictor": "tournament", "entries": 4096 },
///     "cache": { "sets": 128, "ways": 4, "prefetcher": "stride" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.branch.predictor, BranchPredictorKind::Tournament);
/// assert_eq!(config.branch.entries, 4096);
/// assert_eq!(config.cache.prefetcher, PrefetcherKind::Stride);
/// assert_eq!(config.cache.block_bytes, 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Heartbeat, checkpoint and stop-point settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Branch predictor selection and table size
    #[serde(default)]
    pub branch: BranchConfig,
    /// Cache geometry and prefetcher selection
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a JSON document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown variant
    /// names, or any error reported by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document without validating it.
    ///
    /// Used when values are still to be overridden; the simulation
    /// constructors validate the sections they use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown variant
    /// names.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every section for degenerate values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general.validate()?;
        self.branch.validate()?;
        self.cache.validate()
    }
}

/// Reporting cadence and simulation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Instructions between heartbeat log lines
    #[serde(default = "GeneralConfig::default_heartbeat")]
    pub heartbeat_interval: u64,
    /// Instruction count at which a branch simulation stops
    #[serde(default = "GeneralConfig::default_stop_after")]
    pub stop_after: u64,
    /// Memory accesses between checkpoint reports
    #[serde(default = "GeneralConfig::default_checkpoint")]
    pub checkpoint_interval: u64,
    /// Access count at which a cache simulation stops
    #[serde(default = "GeneralConfig::default_access_limit")]
    pub access_limit: u64,
}

impl GeneralConfig {
    const fn default_heartbeat() -> u64 {
        defaults::HEARTBEAT_INTERVAL
    }

    const fn default_stop_after() -> u64 {
        defaults::STOP_AFTER
    }

    const fn default_checkpoint() -> u64 {
        defaults::CHECKPOINT_INTERVAL
    }

    const fn default_access_limit() -> u64 {
        defaults::ACCESS_LIMIT
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval == 0 {
            return Err(ConfigError::ZeroInterval("heartbeat"));
        }
        if self.checkpoint_interval == 0 {
            return Err(ConfigError::ZeroInterval("checkpoint"));
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: defaults::HEARTBEAT_INTERVAL,
            stop_after: defaults::STOP_AFTER,
            checkpoint_interval: defaults::CHECKPOINT_INTERVAL,
            access_limit: defaults::ACCESS_LIMIT,
        }
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchConfig {
    /// Predictor variant
    #[serde(default)]
    pub predictor: BranchPredictorKind,
    /// Entries in each pattern history table
    #[serde(default = "BranchConfig::default_entries")]
    pub entries: u64,
}

impl BranchConfig {
    const fn default_entries() -> u64 {
        defaults::BP_ENTRIES
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        // The always-taken predictor ignores its table size.
        if self.entries == 0 && self.predictor != BranchPredictorKind::AlwaysTaken {
            return Err(ConfigError::ZeroEntries);
        }
        Ok(())
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            predictor: BranchPredictorKind::default(),
            entries: defaults::BP_ENTRIES,
        }
    }
}

/// Cache and prefetcher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of sets
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,
    /// Associativity (1 for direct mapped)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,
    /// Block size in bytes
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: usize,
    /// Prefetcher variant
    #[serde(default)]
    pub prefetcher: PrefetcherKind,
    /// Prefetch aggression (blocks or distances issued per trigger)
    #[serde(default = "CacheConfig::default_aggression")]
    pub aggression: usize,
    /// Seed for RPT random replacement
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    const fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    const fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    const fn default_block() -> usize {
        defaults::CACHE_BLOCK
    }

    const fn default_aggression() -> usize {
        defaults::AGGRESSION
    }

    const fn default_seed() -> u64 {
        defaults::SEED
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self.block_bytes == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.aggression == 0 && self.prefetcher != PrefetcherKind::None {
            return Err(ConfigError::ZeroAggression(self.prefetcher.as_str()));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates the default cache: 64 sets, 2 ways,
    /// 4-byte blocks, no prefetcher, aggression 2.
    fn default() -> Self {
        Self {
            sets: defaults::CACHE_SETS,
            ways: defaults::CACHE_WAYS,
            block_bytes: defaults::CACHE_BLOCK,
            prefetcher: PrefetcherKind::default(),
            aggression: defaults::AGGRESSION,
            seed: defaults::SEED,
        }
    }
}
