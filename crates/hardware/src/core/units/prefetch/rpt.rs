//! Reference Prediction Table storage.
//!
//! Both RPT prefetchers keep a small table of learned entries. An entry is
//! appended the first time its key is seen; once the table is full, a new
//! key overwrites a victim chosen uniformly at random. There is no recency
//! tracking.

use rand::Rng;

use crate::common::constants::RPT_ENTRIES;

/// Fixed-capacity table of RPT entries.
#[derive(Debug, Clone)]
pub struct ReferencePredictionTable<E> {
    entries: Vec<E>,
    capacity: usize,
}

impl<E> ReferencePredictionTable<E> {
    /// Creates an empty table holding at most [`RPT_ENTRIES`] entries.
    pub fn new() -> Self {
        Self::with_capacity(RPT_ENTRIES)
    }

    /// Creates an empty table holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Number of occupied entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the first entry matching `pred`.
    pub fn position(&self, pred: impl FnMut(&E) -> bool) -> Option<usize> {
        self.entries.iter().position(pred)
    }

    /// Returns the entry at `idx`.
    pub fn get(&self, idx: usize) -> Option<&E> {
        self.entries.get(idx)
    }

    /// Returns the entry at `idx` mutably.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut E> {
        self.entries.get_mut(idx)
    }

    /// Iterates over occupied entries.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter()
    }

    /// Iterates mutably over occupied entries.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.iter_mut()
    }

    /// Stores `entry`, appending while there is room and otherwise
    /// overwriting a uniformly random victim.
    ///
    /// # Returns
    ///
    /// The index the entry was written to.
    pub fn allocate<R: Rng + ?Sized>(&mut self, entry: E, rng: &mut R) -> usize {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            self.entries.len() - 1
        } else {
            let victim = rng.gen_range(0..self.capacity);
            tracing::trace!(victim, "rpt full, replacing random entry");
            self.entries[victim] = entry;
            victim
        }
    }
}

impl<E> Default for ReferencePredictionTable<E> {
    fn default() -> Self {
        Self::new()
    }
}
