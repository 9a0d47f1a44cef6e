// ampseed: Antimicrobial peptide classification with spaced-seed k-mer profiles.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! K-mer frequency table with spaced-seed matching.
//!
//! [MultiSeedStore] is a chained hash table where keys are always hashed and
//! compared after masking with one of several seed masks. Each logical key
//! is stored once per seed, so a single lookup answers whether the key
//! matches anything under any of the seeds.
//!
use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// A node in a bucket chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreEntry {
    /// Unmasked k-mer.
    pub key: u64,
    pub frequency: u64,
    /// Index of the mask this node was placed with.
    pub seed: u32,
}

/// A k-mer and its count, as returned by [MultiSeedStore::ranked_frequencies].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KmerFrequency {
    pub key: u64,
    pub frequency: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultiSeedStore {
    buckets: Vec<Vec<StoreEntry>>,
    masks: Vec<u64>,
    load_factor: f64,
    // Distinct logical keys, not nodes.
    size: usize,
}

fn hash(
    masked: u64,
) -> u64 {
    // Class codes only use a few bits each, spread them before the modulo.
    let mut h = masked.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= h >> 32;
    h ^= (h >> 20) ^ (h >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

impl MultiSeedStore {
    /// Empty store matching keys under `masks`.
    ///
    /// An empty `masks` is replaced with a single mask that compares whole
    /// keys.
    ///
    pub fn new(masks: &[u64]) -> Self {
        let mut store = MultiSeedStore {
            buckets: vec![Vec::new(); DEFAULT_CAPACITY],
            masks: masks.to_vec(), load_factor: DEFAULT_LOAD_FACTOR, size: 0,
        };
        if store.masks.is_empty() {
            store.masks.push(u64::MAX);
        }
        store
    }

    /// Empty store with at least 1 bucket.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidLoadFactor] unless `load_factor` is finite
    /// and positive.
    ///
    pub fn with_capacity_and_load_factor(
        masks: &[u64],
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self> {
        if !load_factor.is_finite() || load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        let mut store = Self::new(masks);
        store.buckets = vec![Vec::new(); capacity.max(1)];
        store.load_factor = load_factor;
        Ok(store)
    }

    /// Rebuild a store from `(bucket, entry)` pairs in chain order.
    ///
    /// ## Errors
    ///
    /// Returns [Error::CorruptBlock] if a bucket or seed index is out of
    /// range, and [Error::InvalidLoadFactor] for a bad `load_factor`.
    ///
    pub fn from_parts<I: IntoIterator<Item = (usize, StoreEntry)>>(
        masks: &[u64],
        load_factor: f64,
        capacity: usize,
        entries: I,
        size: usize,
    ) -> Result<Self> {
        let mut store = Self::with_capacity_and_load_factor(masks, capacity, load_factor)?;
        for (bucket, entry) in entries {
            if bucket >= store.buckets.len() {
                return Err(Error::CorruptBlock(format!("bucket {} >= capacity {}", bucket, store.buckets.len())));
            }
            if entry.seed as usize >= store.masks.len() {
                return Err(Error::CorruptBlock(format!("seed {} >= {} seeds", entry.seed, store.masks.len())));
            }
            store.buckets[bucket].push(entry);
        }
        store.size = size;
        Ok(store)
    }

    fn bucket_index(
        &self,
        masked: u64,
    ) -> usize {
        (hash(masked) % self.buckets.len() as u64) as usize
    }

    /// Frequency of the first entry matching `key` under any mask.
    ///
    /// Masks are tried in order and each one only considers the entries
    /// placed with it. Returns 0 if nothing matches.
    ///
    pub fn get(
        &self,
        key: u64,
    ) -> u64 {
        for (seed, mask) in self.masks.iter().enumerate() {
            let masked = key & mask;
            let bucket = &self.buckets[self.bucket_index(masked)];
            if let Some(entry) = bucket.iter().find(|entry| entry.seed as usize == seed && entry.key & mask == masked) {
                return entry.frequency;
            }
        }
        0
    }

    /// Set the frequency of `key` under every mask.
    ///
    /// For each mask the entry placed with that mask that matches `key` is
    /// overwritten, or a new entry is appended if none matches. Grows the table first if
    /// adding a key would exceed the load factor.
    ///
    pub fn put(
        &mut self,
        key: u64,
        frequency: u64,
    ) {
        self.ensure_capacity();

        // Locate matches before writing so that a mask cannot match a node
        // appended for an earlier mask in this call.
        let slots: Vec<(usize, Option<usize>)> = self.masks.iter().enumerate().map(|(seed, mask)| {
            let masked = key & mask;
            let idx = self.bucket_index(masked);
            (idx, self.buckets[idx].iter().position(|entry| entry.seed as usize == seed && entry.key & mask == masked))
        }).collect();

        if slots.iter().all(|(_, pos)| pos.is_none()) {
            self.size += 1;
        }

        for (seed, (idx, pos)) in slots.into_iter().enumerate() {
            match pos {
                Some(pos) => self.buckets[idx][pos].frequency = frequency,
                None => self.buckets[idx].push(StoreEntry { key, frequency, seed: seed as u32 }),
            }
        }
    }

    /// Count one more occurrence of `key` and return the new frequency.
    pub fn increment(
        &mut self,
        key: u64,
    ) -> u64 {
        let frequency = self.get(key) + 1;
        self.put(key, frequency);
        frequency
    }

    fn ensure_capacity(&mut self) {
        let needed = (self.size + 1) as f64;
        let mut capacity = self.buckets.len();
        while needed > self.load_factor * capacity as f64 {
            capacity = (capacity * 3 / 2).max(capacity + 1);
        }
        if capacity != self.buckets.len() {
            self.resize(capacity);
        }
    }

    fn resize(
        &mut self,
        capacity: usize,
    ) {
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); capacity]);
        for entry in old.into_iter().flatten() {
            let idx = self.bucket_index(entry.key & self.masks[entry.seed as usize]);
            self.buckets[idx].push(entry);
        }
    }

    /// Keys of all entries in bucket order.
    ///
    /// A key appears once for each mask it was stored under.
    ///
    pub fn keys(&self) -> Vec<u64> {
        self.buckets.iter().flatten().map(|entry| entry.key).collect()
    }

    /// Up to `limit` entries sorted by descending frequency.
    ///
    /// Ties keep bucket order.
    ///
    pub fn ranked_frequencies(
        &self,
        limit: usize,
    ) -> Vec<KmerFrequency> {
        let mut ranked: Vec<KmerFrequency> = self.buckets.iter().flatten().map(|entry| {
            KmerFrequency { key: entry.key, frequency: entry.frequency }
        }).collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        ranked.truncate(limit);
        ranked
    }

    /// Entries with their bucket index, in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StoreEntry)> {
        self.buckets.iter().enumerate().flat_map(|(idx, bucket)| {
            bucket.iter().map(move |entry| (idx, entry))
        })
    }

    /// Number of distinct keys.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of entries across all masks.
    pub fn num_entries(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn masks(&self) -> &[u64] {
        &self.masks
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Remove all entries and shrink to a single bucket.
    pub fn clear(&mut self) {
        self.buckets = vec![Vec::new()];
        self.size = 0;
    }
}
