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

//! Reference profiles for each peptide family.
//!
//! A [ProfileDatabase] holds one [MultiSeedStore] per [Family] together
//! with the alphabet, seeds and [Distance] used to build and query them.
//! Queries are scored against every profile with
//! [classify](ProfileDatabase::classify).
//!
use indexmap::IndexMap;

use crate::alphabet::Alphabet;
use crate::alphabet::AlphabetTable;
use crate::distance::Distance;
use crate::distance::Metric;
use crate::error::Error;
use crate::error::Result;
use crate::kmer::encode_sequence;
use crate::kmer::seed::SeedSet;
use crate::kmer::seed::DEFAULT_SEEDS;
use crate::sequence::SequenceRecord;
use crate::sequence::SequenceType;
use crate::store::MultiSeedStore;
use crate::store::DEFAULT_CAPACITY;
use crate::store::DEFAULT_LOAD_FACTOR;

pub mod family;

pub use family::Family;

/// Score of a query against one family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationResult {
    pub family: Family,
    pub score: f64,
}

/// Parameters for building a [ProfileDatabase].
#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// Identifier in the [AlphabetTable].
    pub alphabet: String,
    pub seed_patterns: Vec<String>,
    pub distance: Distance,
    pub load_factor: f64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            alphabet: "murphy-10".to_string(),
            seed_patterns: DEFAULT_SEEDS.iter().map(|x| x.to_string()).collect(),
            distance: Distance::default(),
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileDatabase {
    alphabet: Alphabet,
    seeds: SeedSet,
    distance: Distance,
    load_factor: f64,
    profiles: IndexMap<Family, MultiSeedStore>,
}

impl ProfileDatabase {
    /// Empty database configured from `config`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::UnknownAlphabet] if `config.alphabet` is not in
    /// `table`, or an error from [SeedSet::new] or
    /// [with_alphabet](ProfileDatabase::with_alphabet).
    ///
    pub fn new(
        config: &DatabaseConfig,
        table: &AlphabetTable,
    ) -> Result<Self> {
        let alphabet = table.get(&config.alphabet)?.clone();
        let seeds = SeedSet::new(&config.seed_patterns, &alphabet)?;
        Self::with_alphabet(alphabet, seeds, config.distance, config.load_factor)
    }

    /// Empty database using `alphabet` and `seeds`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidLoadFactor] unless `load_factor` is finite
    /// and positive.
    ///
    pub fn with_alphabet(
        alphabet: Alphabet,
        seeds: SeedSet,
        distance: Distance,
        load_factor: f64,
    ) -> Result<Self> {
        if !load_factor.is_finite() || load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        Ok(ProfileDatabase { alphabet, seeds, distance, load_factor, profiles: IndexMap::new() })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn seeds(&self) -> &SeedSet {
        &self.seeds
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn profiles(&self) -> &IndexMap<Family, MultiSeedStore> {
        &self.profiles
    }

    pub fn profile(&self, family: Family) -> Option<&MultiSeedStore> {
        self.profiles.get(&family)
    }

    /// Empty store using this database's masks.
    pub fn new_store(&self) -> Result<MultiSeedStore> {
        MultiSeedStore::with_capacity_and_load_factor(self.seeds.masks(), DEFAULT_CAPACITY, self.load_factor)
    }

    /// Count the k-mers of `residues` into `store`.
    pub fn add_sequence(
        &self,
        store: &mut MultiSeedStore,
        residues: &[u8],
    ) {
        encode_sequence(residues, &self.alphabet).for_each(|kmer| {
            store.increment(kmer);
        });
    }

    /// Store with the k-mer counts of a single sequence.
    pub fn build_store(
        &self,
        residues: &[u8],
    ) -> Result<MultiSeedStore> {
        let mut store = self.new_store()?;
        self.add_sequence(&mut store, residues);
        Ok(store)
    }

    /// Register `store` as the profile of `family`.
    ///
    /// Replaces an existing profile for the same family.
    ///
    /// ## Errors
    ///
    /// Returns [Error::UntrainableFamily] for [Family::Unknown].
    ///
    pub fn add_profile(
        &mut self,
        family: Family,
        store: MultiSeedStore,
    ) -> Result<()> {
        if family == Family::Unknown {
            return Err(Error::UntrainableFamily);
        }
        self.profiles.insert(family, store);
        Ok(())
    }

    /// Build the profile of `family` from `records`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidSequenceType] if a record is not a protein
    /// and [Error::UntrainableFamily] for [Family::Unknown].
    ///
    pub fn train(
        &mut self,
        family: Family,
        records: &[SequenceRecord],
    ) -> Result<()> {
        let mut store = self.new_store()?;
        for record in records {
            check_protein(record)?;
            self.add_sequence(&mut store, &record.residues);
        }
        log::debug!("Trained {} from {} sequences: {} k-mers in {} buckets", family, records.len(), store.size(), store.capacity());
        self.add_profile(family, store)
    }

    /// Score `query` against every profile.
    ///
    /// Only positive scores are kept, ordered best first by the database's
    /// [Distance]. Returns an empty Vec if nothing scores.
    ///
    pub fn classify(
        &self,
        query: &MultiSeedStore,
    ) -> Vec<ClassificationResult> {
        let masks = self.seeds.masks();
        let mut results: Vec<ClassificationResult> = self.profiles.iter().filter_map(|(family, profile)| {
            let score = self.distance.distance(masks, query, profile);
            (score > 0.0).then_some(ClassificationResult { family: *family, score })
        }).collect();
        results.sort_by(|a, b| self.distance.compare(a, b));
        results
    }

    /// Score `query` by summing the profile frequencies of its k-mers.
    ///
    /// Ignores the configured [Distance], results are in descending order.
    ///
    pub fn classify_by_raw_overlap(
        &self,
        query: &MultiSeedStore,
    ) -> Vec<ClassificationResult> {
        let keys = query.keys();
        let mut results: Vec<ClassificationResult> = self.profiles.iter().filter_map(|(family, profile)| {
            let overlap: u64 = keys.iter().map(|key| profile.get(*key)).sum();
            (overlap > 0).then_some(ClassificationResult { family: *family, score: overlap as f64 })
        }).collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    /// Encode a protein sequence and [classify](ProfileDatabase::classify) it.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidSequenceType] if `record` is not a protein.
    ///
    pub fn classify_sequence(
        &self,
        record: &SequenceRecord,
    ) -> Result<Vec<ClassificationResult>> {
        check_protein(record)?;
        let query = self.build_store(&record.residues)?;
        Ok(self.classify(&query))
    }
}

fn check_protein(
    record: &SequenceRecord,
) -> Result<()> {
    if record.kind != SequenceType::Protein {
        return Err(Error::InvalidSequenceType { name: record.name.clone(), found: record.kind });
    }
    Ok(())
}

/// Family of the best result, or [Family::Unknown] if there are none.
pub fn best_family(
    results: &[ClassificationResult],
) -> Family {
    results.first().map(|x| x.family).unwrap_or(Family::Unknown)
}

#[cfg(test)]
mod tests {
    use super::ProfileDatabase;
    use crate::alphabet::Alphabet;
    use crate::distance::Distance;
    use crate::kmer::seed::SeedSet;

    fn acgt_database(distance: Distance) -> ProfileDatabase {
        let alphabet = Alphabet::from_groups("acgt", &["A", "C", "G", "TDEFHIKLMNPQRSVWY"]).unwrap();
        let seeds = SeedSet::default_for(&alphabet).unwrap();
        ProfileDatabase::with_alphabet(alphabet, seeds, distance, 0.75).unwrap()
    }

    #[test]
    fn classify_four_symbol_alphabet() {
        use super::Family;

        let mut db = acgt_database(Distance::MajorityCount);
        let x = db.build_store(b"AACC").unwrap();
        let y = db.build_store(b"GGTT").unwrap();
        db.add_profile(Family::Abaecin, x).unwrap();
        db.add_profile(Family::Bacteriocin, y).unwrap();

        let query = db.build_store(b"AACC").unwrap();
        let got = db.classify(&query);

        // One k-mer per side, stored once per seed: 6 x 6 entries under 6 seeds.
        assert_eq!(got[0].family, Family::Abaecin);
        assert_eq!(got[0].score, 216.0);
        assert!(got.iter().all(|x| x.family != Family::Bacteriocin || x.score < got[0].score));
    }

    #[test]
    fn classify_out_of_place_ascending() {
        use super::Family;
        use crate::store::MultiSeedStore;

        let alphabet = Alphabet::from_groups("acgt", &["A", "C", "G", "TDEFHIKLMNPQRSVWY"]).unwrap();
        let seeds = SeedSet::new(&["1".repeat(32)], &alphabet).unwrap();
        assert_eq!(seeds.masks(), &[u64::MAX]);
        let mut db = ProfileDatabase::with_alphabet(alphabet, seeds, Distance::OutOfPlace { top: 4 }, 0.75).unwrap();

        let store = |counts: &[(u64, u64)]| {
            let mut store = MultiSeedStore::new(&[u64::MAX]);
            counts.iter().for_each(|(key, frequency)| store.put(*key, *frequency));
            store
        };
        // Same ranks as the query: 0.
        db.add_profile(Family::Aurein, store(&[(1, 9), (2, 5)])).unwrap();
        // Key 1 one rank down, key 2 missing: (1 + 4) / 2.
        db.add_profile(Family::Caerin, store(&[(5, 9), (1, 5)])).unwrap();
        // Key 2 one rank down: 1 / 3.
        db.add_profile(Family::Dermaseptin, store(&[(1, 9), (6, 5), (2, 3)])).unwrap();
        // Both keys missing: (5 + 4) / 1.
        db.add_profile(Family::Esculentin, store(&[(9, 4)])).unwrap();

        let got = db.classify(&store(&[(1, 3), (2, 2)]));
        let families: Vec<Family> = got.iter().map(|x| x.family).collect();

        assert_eq!(families, vec![Family::Dermaseptin, Family::Caerin, Family::Esculentin]);
        assert_eq!(got[0].score, 1.0 / 3.0);
        assert_eq!(got[1].score, 2.5);
        assert_eq!(got[2].score, 9.0);
        assert!(got.windows(2).all(|x| x[0].score.abs() <= x[1].score.abs()));
    }

    #[test]
    fn raw_overlap_agrees_on_top_family() {
        use super::best_family;
        use super::Family;

        let mut db = acgt_database(Distance::MajorityCount);
        db.add_profile(Family::Cecropin, db.build_store(b"ACGTTGCAAC").unwrap()).unwrap();
        db.add_profile(Family::Hevein, db.build_store(b"GGTTAACCGT").unwrap()).unwrap();
        db.add_profile(Family::Snakin, db.build_store(b"TTTTGGGGCC").unwrap()).unwrap();

        let query = db.build_store(b"GGTTAACCGT").unwrap();
        let by_distance = db.classify(&query);
        let by_overlap = db.classify_by_raw_overlap(&query);

        assert_eq!(best_family(&by_distance), Family::Hevein);
        assert_eq!(best_family(&by_overlap), Family::Hevein);
    }

    #[test]
    fn classify_is_repeatable_and_positive() {
        use super::Family;
        use crate::alphabet::AlphabetTable;
        use crate::database::DatabaseConfig;
        use crate::sequence::SequenceRecord;

        let table = AlphabetTable::builtin().unwrap();
        let mut db = ProfileDatabase::new(&DatabaseConfig::default(), &table).unwrap();

        let temporins = vec![
            SequenceRecord::protein("temporin-a", b"FLPLIGRVLSGIL"),
            SequenceRecord::protein("temporin-b", b"LLPIVGNLLKSLL"),
            SequenceRecord::protein("temporin-l", b"FVQWFSKFLGRIL"),
        ];
        let magainins = vec![
            SequenceRecord::protein("magainin-1", b"GIGKFLHSAGKFGKAFVGEIMKS"),
            SequenceRecord::protein("magainin-2", b"GIGKFLHSAKKFGKAFVGEIMNS"),
        ];
        db.train(Family::Temporin, &temporins).unwrap();
        db.train(Family::Magainin, &magainins).unwrap();

        let query = SequenceRecord::protein("query", b"GIGKFLHSAKKFGKAFVGEIMKS");
        let first = db.classify_sequence(&query).unwrap();
        let second = db.classify_sequence(&query).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].family, Family::Magainin);
        assert!(first.iter().all(|x| x.score > 0.0));
    }

    #[test]
    fn no_match_is_unknown() {
        use super::best_family;
        use super::Family;

        let mut db = acgt_database(Distance::MajorityCount);
        db.add_profile(Family::Lectin, db.build_store(b"AAAA").unwrap()).unwrap();

        let query = db.build_store(b"TTTT").unwrap();
        let got = db.classify(&query);

        assert!(got.is_empty());
        assert_eq!(best_family(&got), Family::Unknown);
    }

    #[test]
    fn reject_nucleotide_query() {
        use crate::error::Error;
        use crate::sequence::SequenceRecord;
        use crate::sequence::SequenceType;

        let db = acgt_database(Distance::MajorityCount);
        let record = SequenceRecord::new("read", b"ACGT", SequenceType::Nucleotide);

        let got = db.classify_sequence(&record);

        assert!(matches!(got, Err(Error::InvalidSequenceType { .. })));
    }

    #[test]
    fn add_profile_replaces_and_rejects_unknown() {
        use super::Family;

        let mut db = acgt_database(Distance::MajorityCount);
        db.add_profile(Family::Histone, db.build_store(b"AAAA").unwrap()).unwrap();
        db.add_profile(Family::Histone, db.build_store(b"CCCC").unwrap()).unwrap();

        assert_eq!(db.profiles().len(), 1);
        assert_eq!(db.profile(Family::Histone).unwrap().get(0b01_01_01_01), 1);
        assert!(db.add_profile(Family::Unknown, db.build_store(b"AAAA").unwrap()).is_err());
    }
}
