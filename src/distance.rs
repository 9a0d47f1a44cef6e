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

//! Scoring a query profile against a reference profile.
//!
//! Two scores are available through [Distance]:
//!
//!   - [MajorityCount] counts the entry pairs that match under each seed.
//!     Higher is better.
//!   - [OutOfPlace] compares the ranks of the most frequent k-mers. Values
//!     closer to zero are better.
//!
use std::cmp::Ordering;

use crate::database::ClassificationResult;
use crate::store::KmerFrequency;
use crate::store::MultiSeedStore;

pub const DEFAULT_TOP: usize = 100;

/// A score for a query against one profile, and the order of the results.
pub trait Metric {
    fn distance(
        &self,
        masks: &[u64],
        query: &MultiSeedStore,
        profile: &MultiSeedStore,
    ) -> f64;

    /// Ordering of results from best to worst.
    fn compare(
        &self,
        a: &ClassificationResult,
        b: &ClassificationResult,
    ) -> Ordering;
}

fn matches_any(
    masks: &[u64],
    a: u64,
    b: u64,
) -> bool {
    masks.iter().any(|mask| a & mask == b & mask)
}

/// Number of (query k-mer, profile k-mer, mask) triples that match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MajorityCount;

impl Metric for MajorityCount {
    fn distance(
        &self,
        masks: &[u64],
        query: &MultiSeedStore,
        profile: &MultiSeedStore,
    ) -> f64 {
        let query_ranks = query.ranked_frequencies(query.num_entries());
        let profile_ranks = profile.ranked_frequencies(profile.num_entries());

        let matches: usize = query_ranks.iter().map(|q| {
            profile_ranks.iter().map(|p| {
                masks.iter().filter(|mask| q.key & **mask == p.key & **mask).count()
            }).sum::<usize>()
        }).sum();

        matches as f64
    }

    fn compare(
        &self,
        a: &ClassificationResult,
        b: &ClassificationResult,
    ) -> Ordering {
        b.score.total_cmp(&a.score)
    }
}

/// Rank displacement of the `top` most frequent k-mers.
///
/// For the query k-mer at rank `i`, finds the rank `j` of the first
/// profile k-mer matching it under any mask, or `top + 1` if there is none,
/// and sums `j - i`. The sum is divided by the profile size.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfPlace {
    pub top: usize,
}

impl Default for OutOfPlace {
    fn default() -> Self {
        OutOfPlace { top: DEFAULT_TOP }
    }
}

impl OutOfPlace {
    fn rank_in(
        &self,
        masks: &[u64],
        key: u64,
        ranks: &[KmerFrequency],
    ) -> usize {
        ranks.iter().position(|x| matches_any(masks, key, x.key)).unwrap_or(self.top + 1)
    }
}

impl Metric for OutOfPlace {
    fn distance(
        &self,
        masks: &[u64],
        query: &MultiSeedStore,
        profile: &MultiSeedStore,
    ) -> f64 {
        if profile.size() == 0 {
            return 0.0;
        }
        let query_ranks = query.ranked_frequencies(self.top);
        let profile_ranks = profile.ranked_frequencies(self.top);

        let displacement: i64 = query_ranks.iter().enumerate().map(|(rank, q)| {
            self.rank_in(masks, q.key, &profile_ranks) as i64 - rank as i64
        }).sum();

        displacement as f64 / profile.size() as f64
    }

    fn compare(
        &self,
        a: &ClassificationResult,
        b: &ClassificationResult,
    ) -> Ordering {
        a.score.abs().total_cmp(&b.score.abs())
    }
}

/// Supported scoring strategies.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Distance {
    #[default]
    MajorityCount,
    OutOfPlace { top: usize },
}

impl Distance {
    /// Set the number of ranks compared by [Distance::OutOfPlace].
    pub fn with_top(self, top: usize) -> Self {
        match self {
            Distance::OutOfPlace { .. } => Distance::OutOfPlace { top },
            other => other,
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            Distance::MajorityCount => 0,
            Distance::OutOfPlace { .. } => 1,
        }
    }

    pub fn from_u8(val: u8, top: usize) -> Option<Self> {
        match val {
            0 => Some(Distance::MajorityCount),
            1 => Some(Distance::OutOfPlace { top }),
            _ => None,
        }
    }

    pub fn top(&self) -> usize {
        match self {
            Distance::OutOfPlace { top } => *top,
            _ => 0,
        }
    }
}

impl Metric for Distance {
    fn distance(
        &self,
        masks: &[u64],
        query: &MultiSeedStore,
        profile: &MultiSeedStore,
    ) -> f64 {
        match self {
            Distance::MajorityCount => MajorityCount.distance(masks, query, profile),
            Distance::OutOfPlace { top } => OutOfPlace { top: *top }.distance(masks, query, profile),
        }
    }

    fn compare(
        &self,
        a: &ClassificationResult,
        b: &ClassificationResult,
    ) -> Ordering {
        match self {
            Distance::MajorityCount => MajorityCount.compare(a, b),
            Distance::OutOfPlace { top } => OutOfPlace { top: *top }.compare(a, b),
        }
    }
}

impl std::str::FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "majority" | "majority-count" => Ok(Distance::MajorityCount),
            "out-of-place" => Ok(Distance::OutOfPlace { top: DEFAULT_TOP }),
            _ => Err(format!("'{}' is not a valid Distance", s)),
        }
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distance::MajorityCount => write!(f, "majority"),
            Distance::OutOfPlace { top } => write!(f, "out-of-place (top {})", top),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::MultiSeedStore;

    fn store(
        masks: &[u64],
        counts: &[(u64, u64)],
    ) -> MultiSeedStore {
        let mut store = MultiSeedStore::new(masks);
        counts.iter().for_each(|(key, frequency)| store.put(*key, *frequency));
        store
    }

    #[test]
    fn majority_count_counts_seed_matches() {
        use super::MajorityCount;
        use super::Metric;

        let masks = [u64::MAX];
        let query = store(&masks, &[(1, 2), (2, 1)]);
        let profile = store(&masks, &[(1, 5), (3, 4), (2, 1)]);
        let other = store(&masks, &[(4, 5)]);

        assert_eq!(MajorityCount.distance(&masks, &query, &profile), 2.0);
        assert_eq!(MajorityCount.distance(&masks, &query, &other), 0.0);
    }

    #[test]
    fn majority_count_counts_each_mask() {
        use super::MajorityCount;
        use super::Metric;

        // 0x10 and 0x11 agree under the first mask only.
        let masks = [0xf0, 0xff];
        let query = store(&masks, &[(0x11, 1)]);
        let profile = store(&masks, &[(0x10, 1)]);

        // Both entries of the query meet both entries of the profile.
        assert_eq!(MajorityCount.distance(&masks, &query, &profile), 4.0);
    }

    #[test]
    fn majority_count_reads_every_entry() {
        use super::MajorityCount;
        use super::Metric;

        let masks = [0xff00, 0x00ff];
        let key = |i: u64| i | i << 8;
        let counts: Vec<(u64, u64)> = (1..=10).map(|i| (key(i), 1)).collect();
        let profile = store(&masks, &counts);
        assert_eq!(profile.num_entries(), 20);

        for i in 1..=10 {
            let query = store(&masks, &[(key(i), 1)]);
            assert_eq!(MajorityCount.distance(&masks, &query, &profile), 8.0);
        }
    }

    #[test]
    fn out_of_place_exact_ranks() {
        use super::Metric;
        use super::OutOfPlace;

        let masks = [u64::MAX];
        let query = store(&masks, &[(1, 3), (2, 2)]);
        let profile = store(&masks, &[(2, 9), (1, 5), (7, 1), (8, 1)]);

        // Key 1 is at rank 1 in the profile and rank 0 in the query, key 2
        // at rank 0 and 1: (1 - 0) + (0 - 1) = 0.
        let got = OutOfPlace { top: 4 }.distance(&masks, &query, &profile);
        assert_eq!(got, 0.0);
    }

    #[test]
    fn out_of_place_missing_key() {
        use super::Metric;
        use super::OutOfPlace;

        let masks = [u64::MAX];
        let query = store(&masks, &[(5, 3), (1, 2)]);
        let profile = store(&masks, &[(1, 9), (2, 5)]);

        // Key 5 is missing: (3 + 1 - 0) + (0 - 1) = 3, over 2 profile keys.
        let got = OutOfPlace { top: 3 }.distance(&masks, &query, &profile);
        assert_eq!(got, 1.5);
    }

    #[test]
    fn out_of_place_empty_profile() {
        use super::Metric;
        use super::OutOfPlace;

        let masks = [u64::MAX];
        let query = store(&masks, &[(5, 3)]);
        let profile = store(&masks, &[]);

        assert_eq!(OutOfPlace::default().distance(&masks, &query, &profile), 0.0);
    }

    #[test]
    fn comparators() {
        use super::Distance;
        use super::Metric;
        use crate::database::ClassificationResult;
        use crate::database::Family;
        use std::cmp::Ordering;

        let a = ClassificationResult { family: Family::Aurein, score: 3.0 };
        let b = ClassificationResult { family: Family::Caerin, score: -1.0 };

        assert_eq!(Distance::MajorityCount.compare(&a, &b), Ordering::Less);
        assert_eq!(Distance::OutOfPlace { top: 10 }.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn parse_distance() {
        use super::Distance;
        use super::DEFAULT_TOP;
        use std::str::FromStr;

        assert_eq!(Distance::from_str("majority").unwrap(), Distance::MajorityCount);
        assert_eq!(Distance::from_str("out-of-place").unwrap(), Distance::OutOfPlace { top: DEFAULT_TOP });
        assert_eq!(Distance::from_str("out-of-place").unwrap().with_top(5).top(), 5);
        assert!(Distance::from_str("euclidean").is_err());
    }
}
