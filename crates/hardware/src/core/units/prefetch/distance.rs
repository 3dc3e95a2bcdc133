//! Distance Prefetcher.
//!
//! Correlates consecutive miss distances across the whole program rather
//! than per load. The prefetcher remembers the previous miss address and the
//! previous distance; its 64-row Reference Prediction Table maps a distance
//! to up to `aggression` distances that were observed to follow it.
//!
//! On a miss at `addr` with `d = addr - prev_addr`, every non-zero distance
//! predicted by row `d` is prefetched relative to `addr`. Training then
//! records `d` as a successor of the previous distance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Prefetcher, fill_if_absent, rpt::ReferencePredictionTable};
use crate::core::units::cache::Cache;

/// RPT row: a distance and the distances that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceRow {
    /// Distance this row is keyed by.
    pub distance: i64,
    /// Predicted successor distances; zero marks an empty slot.
    pub predicted: Vec<i64>,
}

impl DistanceRow {
    fn new(distance: i64, slots: usize) -> Self {
        Self {
            distance,
            predicted: vec![0; slots],
        }
    }

    /// Records `distance` in the first empty slot, or over a random slot
    /// when every slot is taken.
    fn record<R: Rng + ?Sized>(&mut self, distance: i64, rng: &mut R) {
        if let Some(slot) = self.predicted.iter_mut().find(|d| **d == 0) {
            *slot = distance;
        } else if !self.predicted.is_empty() {
            let idx = rng.gen_range(0..self.predicted.len());
            self.predicted[idx] = distance;
        }
    }
}

/// Distance Prefetcher state.
#[derive(Debug, Clone)]
pub struct DistancePrefetcher {
    /// Address of the previous miss.
    prev_addr: u64,
    /// Distance between the previous two misses.
    prev_dist: i64,
    /// Reference Prediction Table keyed by distance.
    table: ReferencePredictionTable<DistanceRow>,
    /// Predicted distances per row.
    aggression: usize,
    /// Victim row and slot selection.
    rng: StdRng,
}

impl DistancePrefetcher {
    /// Creates a new Distance prefetcher.
    ///
    /// # Arguments
    ///
    /// * `aggression` - Predicted distances kept (and prefetched) per row.
    /// * `seed` - Seed for random row and slot replacement.
    pub fn new(aggression: usize, seed: u64) -> Self {
        Self {
            prev_addr: 0,
            prev_dist: 0,
            table: ReferencePredictionTable::new(),
            aggression,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    const fn distance_to(&self, addr: u64) -> i64 {
        addr.wrapping_sub(self.prev_addr) as i64
    }

    /// Looks up the row keyed by `distance`.
    pub fn row(&self, distance: i64) -> Option<&DistanceRow> {
        self.table.iter().find(|row| row.distance == distance)
    }

    /// Distance between the two most recent trained misses.
    pub const fn previous_distance(&self) -> i64 {
        self.prev_dist
    }

    /// Number of rows allocated.
    pub fn rows(&self) -> usize {
        self.table.len()
    }
}

impl Prefetcher for DistancePrefetcher {
    fn prefetch(&mut self, cache: &mut Cache, addr: u64, _pc: u64) -> u64 {
        let dist = self.distance_to(addr);
        let mut issued = 0;
        for row in self.table.iter().filter(|row| row.distance == dist) {
            for &d in row.predicted.iter().filter(|d| **d != 0) {
                if fill_if_absent(cache, addr.wrapping_add_signed(d)) {
                    issued += 1;
                }
            }
        }
        issued
    }

    fn train(&mut self, addr: u64, _pc: u64) {
        let dist = self.distance_to(addr);

        if self.table.position(|row| row.distance == dist).is_none() {
            let idx = self
                .table
                .allocate(DistanceRow::new(dist, self.aggression), &mut self.rng);
            tracing::trace!(dist, idx, "distance row allocated");
        }

        let prev = self.prev_dist;
        let rng = &mut self.rng;
        for row in self.table.iter_mut().filter(|row| row.distance == prev) {
            row.record(dist, rng);
        }

        self.prev_addr = addr;
        self.prev_dist = dist;
    }
}
