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

//! Cross-validation of a [ProfileDatabase] configuration.
//!
//! Every round holds out one fold of each family's sequences, trains the
//! profiles from the rest and classifies the held out sequences. The best
//! family of each test sequence is recorded in a [ConfusionMatrix] against
//! its true family.
//!
//! ## Usage
//!
//! ```rust
//! use ampseed::database::Family;
//! use ampseed::validate::ConfusionMatrix;
//!
//! let mut matrix = ConfusionMatrix::new();
//! matrix.update(Family::Temporin, Family::Temporin);
//! matrix.update(Family::Aurein, Family::Aurein);
//!
//! assert_eq!(matrix.total(), 2);
//! assert_eq!(matrix.mcc(), 1.0);
//! ```
//!
use std::io::Write;
use std::sync::Mutex;

use indexmap::IndexMap;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;
use rayon::ThreadPoolBuilder;

use crate::database::best_family;
use crate::database::Family;
use crate::database::ProfileDatabase;
use crate::error::Result;
use crate::sequence::SequenceRecord;

fn ratio(
    numerator: u64,
    denominator: u64,
) -> f64 {
    if numerator == 0 { 0.0 } else { numerator as f64 / denominator as f64 }
}

/// One-vs-rest counts for a single family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
}

impl ClassCounts {
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn sensitivity(&self) -> f64 {
        self.recall()
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn accuracy(&self) -> f64 {
        if self.tp == 0 { return 0.0 }
        ratio(self.tp + self.tn, self.tp + self.tn + self.fp + self.fn_)
    }

    pub fn f1(&self) -> f64 {
        if self.tp == 0 { return 0.0 }
        let precision = self.precision();
        let recall = self.recall();
        2.0 * precision * recall / (precision + recall)
    }

    /// Binary Matthews correlation coefficient, 0 if any margin is empty.
    pub fn mcc(&self) -> f64 {
        let (tp, fp, tn, fn_) = (self.tp as f64, self.fp as f64, self.tn as f64, self.fn_ as f64);
        let denominator = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
        if denominator == 0.0 { 0.0 } else { (tp * tn - fp * fn_) / denominator }
    }
}

/// Summary over all classes of a [ConfusionMatrix].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatrixStats {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
    /// Multi-class MCC.
    pub mcc: f64,
    /// Macro averaged F1.
    pub mf1: f64,
    /// F1 weighted by class support.
    pub wf1: f64,
}

/// Prediction counts indexed `[predicted][actual]` by [Family::index].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u64>>,
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        ConfusionMatrix { counts: vec![vec![0; Family::COUNT]; Family::COUNT] }
    }
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        predicted: Family,
        actual: Family,
    ) {
        self.counts[predicted.index()][actual.index()] += 1;
    }

    pub fn get(
        &self,
        predicted: Family,
        actual: Family,
    ) -> u64 {
        self.counts[predicted.index()][actual.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn class_counts(
        &self,
        family: Family,
    ) -> ClassCounts {
        let idx = family.index();
        let tp = self.counts[idx][idx];
        let fp = self.counts[idx].iter().sum::<u64>() - tp;
        let fn_ = self.counts.iter().map(|row| row[idx]).sum::<u64>() - tp;
        let tn = self.total() - tp - fp - fn_;
        ClassCounts { tp, fp, tn, fn_ }
    }

    /// Multi-class Matthews correlation coefficient.
    ///
    /// Returns 0 if every sample was predicted as, or belongs to, a single
    /// class.
    ///
    pub fn mcc(&self) -> f64 {
        let s = self.total() as f64;
        let c: f64 = (0..Family::COUNT).map(|idx| self.counts[idx][idx] as f64).sum();

        let mut tp = 0.0;
        let mut tt = 0.0;
        let mut pp = 0.0;
        for idx in 0..Family::COUNT {
            let t = self.counts[idx].iter().sum::<u64>() as f64;
            let p = self.counts.iter().map(|row| row[idx]).sum::<u64>() as f64;
            tp += t * p;
            tt += t * t;
            pp += p * p;
        }

        let denominator = (s * s - pp).sqrt() * (s * s - tt).sqrt();
        if denominator == 0.0 { 0.0 } else { (c * s - tp) / denominator }
    }

    pub fn stats(&self) -> MatrixStats {
        let mut stats = MatrixStats { mcc: self.mcc(), ..Default::default() };
        let mut support: u64 = 0;
        for family in Family::all() {
            let counts = self.class_counts(family);
            stats.tp += counts.tp;
            stats.fp += counts.fp;
            stats.tn += counts.tn;
            stats.fn_ += counts.fn_;

            let f1 = counts.f1();
            stats.mf1 += f1;
            stats.wf1 += f1 * (counts.tp + counts.fn_) as f64;
            support += counts.tp + counts.fn_;
        }
        stats.mf1 /= Family::COUNT as f64;
        stats.wf1 = if support == 0 { 0.0 } else { stats.wf1 / support as f64 };
        stats
    }
}

/// A [ConfusionMatrix] that can be updated from several threads.
#[derive(Debug, Default)]
pub struct SharedConfusionMatrix {
    inner: Mutex<ConfusionMatrix>,
}

impl SharedConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &self,
        predicted: Family,
        actual: Family,
    ) {
        // A panic elsewhere does not invalidate the counts.
        let mut matrix = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        matrix.update(predicted, actual);
    }

    pub fn into_inner(self) -> ConfusionMatrix {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// Size of the input for one family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FamilyStats {
    pub family: Family,
    pub samples: usize,
    pub average_length: f64,
}

impl FamilyStats {
    pub fn from_records(
        family: Family,
        records: &[SequenceRecord],
    ) -> Self {
        let total: usize = records.iter().map(|x| x.residues.len()).sum();
        let average_length = if records.is_empty() { 0.0 } else { total as f64 / records.len() as f64 };
        FamilyStats { family, samples: records.len(), average_length }
    }
}

/// Result of [CrossValidation::run].
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    pub matrix: ConfusionMatrix,
    pub families: Vec<FamilyStats>,
}

/// Holdout settings.
///
/// In round `r` the sequence at index `i` of a family is held out iff
/// `i % folds == (folds - 1 + r) % folds`, so round 0 tests every
/// `folds`th sequence. `threads` workers classify the held out sequences,
/// 0 uses one per core.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossValidation {
    pub folds: usize,
    pub rounds: usize,
    pub threads: usize,
}

impl Default for CrossValidation {
    fn default() -> Self {
        CrossValidation { folds: 8, rounds: 1, threads: 1 }
    }
}

impl CrossValidation {
    pub fn is_held_out(
        &self,
        index: usize,
        round: usize,
    ) -> bool {
        let folds = self.folds.max(1);
        index % folds == (folds - 1 + round) % folds
    }

    /// Run every round using the alphabet, seeds and distance of `template`.
    ///
    /// Profiles already in `template` are replaced by the trained ones.
    /// Test sequences are classified family by family on a pool of
    /// `threads` workers.
    ///
    /// ## Errors
    ///
    /// Returns an error if a record is not a protein, a family cannot be
    /// trained or the thread pool cannot be built.
    ///
    pub fn run(
        &self,
        template: &ProfileDatabase,
        families: &IndexMap<Family, Vec<SequenceRecord>>,
    ) -> Result<ValidationReport> {
        let matrix = SharedConfusionMatrix::new();
        let pool = ThreadPoolBuilder::new().num_threads(self.threads).build()?;

        for round in 0..self.rounds {
            let mut database = template.clone();
            let mut tests: Vec<(Family, Vec<&SequenceRecord>)> = Vec::with_capacity(families.len());

            for (family, records) in families {
                let (test, train): (Vec<(usize, &SequenceRecord)>, Vec<(usize, &SequenceRecord)>) =
                    records.iter().enumerate().partition(|(idx, _)| self.is_held_out(*idx, round));
                let train: Vec<SequenceRecord> = train.into_iter().map(|(_, x)| x.clone()).collect();
                database.train(*family, &train)?;
                tests.push((*family, test.into_iter().map(|(_, x)| x).collect()));
            }
            log::info!("Round {}: trained {} profiles", round + 1, database.profiles().len());

            pool.install(|| -> Result<()> {
                tests.par_iter().try_for_each(|(actual, records)| -> Result<()> {
                    for record in records {
                        let results = database.classify_sequence(record)?;
                        matrix.update(best_family(&results), *actual);
                    }
                    Ok(())
                })
            })?;
        }

        let families = families.iter().map(|(family, records)| FamilyStats::from_records(*family, records)).collect();
        Ok(ValidationReport { matrix: matrix.into_inner(), families })
    }
}

/// Write a tab-separated summary of `report` to `conn`.
///
/// The first two lines are the overall metrics, followed by one line per
/// family.
///
pub fn write_report<W: Write>(
    report: &ValidationReport,
    conn: &mut W,
) -> Result<()> {
    let stats = report.matrix.stats();
    let overall = ClassCounts { tp: stats.tp, fp: stats.fp, tn: stats.tn, fn_: stats.fn_ };

    writeln!(conn, "sensitivity\tspecificity\taccuracy\tmcc\tmacro_f1\tweighted_f1\ttp\ttn\tfp\tfn")?;
    writeln!(conn, "{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}\t{}\t{}",
             overall.sensitivity(), overall.specificity(), overall.accuracy(),
             stats.mcc, stats.mf1, stats.wf1,
             stats.tp, stats.tn, stats.fp, stats.fn_)?;

    writeln!(conn, "family\ttp\tfp\ttn\tfn\tspecificity\tsensitivity\tprecision\taccuracy\tmcc\tf1\tsamples\taverage_length")?;
    for family in Family::all() {
        let counts = report.matrix.class_counts(family);
        let (samples, average_length) = report.families.iter()
                                                       .find(|x| x.family == family)
                                                       .map(|x| (x.samples, x.average_length))
                                                       .unwrap_or((0, 0.0));
        writeln!(conn, "{}\t{}\t{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}\t{:.1}",
                 family, counts.tp, counts.fp, counts.tn, counts.fn_,
                 counts.specificity(), counts.sensitivity(), counts.precision(), counts.accuracy(),
                 counts.mcc(), counts.f1(), samples, average_length)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn perfect_diagonal_mcc() {
        use super::ConfusionMatrix;
        use crate::database::Family;

        let mut matrix = ConfusionMatrix::new();
        for _ in 0..3 {
            matrix.update(Family::Temporin, Family::Temporin);
            matrix.update(Family::Magainin, Family::Magainin);
            matrix.update(Family::Cecropin, Family::Cecropin);
        }

        let stats = matrix.stats();
        assert_eq!(matrix.mcc(), 1.0);
        assert_eq!(stats.tp, 9);
        assert_eq!(stats.fp, 0);
        assert_eq!(stats.wf1, 1.0);
    }

    #[test]
    fn degenerate_mcc_is_zero() {
        use super::ConfusionMatrix;
        use crate::database::Family;

        let mut matrix = ConfusionMatrix::new();
        matrix.update(Family::Unknown, Family::Temporin);
        matrix.update(Family::Unknown, Family::Aurein);

        assert_eq!(matrix.mcc(), 0.0);
        assert_eq!(ConfusionMatrix::new().mcc(), 0.0);
    }

    #[test]
    fn class_counts_from_matrix() {
        use super::ConfusionMatrix;
        use crate::database::Family;

        let mut matrix = ConfusionMatrix::new();
        matrix.update(Family::Temporin, Family::Temporin);
        matrix.update(Family::Temporin, Family::Temporin);
        matrix.update(Family::Temporin, Family::Aurein);
        matrix.update(Family::Aurein, Family::Temporin);
        matrix.update(Family::Caerin, Family::Caerin);

        let got = matrix.class_counts(Family::Temporin);

        assert_eq!((got.tp, got.fp, got.fn_, got.tn), (2, 1, 1, 1));
        assert_eq!(got.precision(), 2.0 / 3.0);
        assert_eq!(got.recall(), 2.0 / 3.0);
        assert!((got.f1() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn binary_metrics_without_hits() {
        use super::ClassCounts;

        let got = ClassCounts { tp: 0, fp: 3, tn: 0, fn_: 2 };

        assert_eq!(got.precision(), 0.0);
        assert_eq!(got.specificity(), 0.0);
        assert_eq!(got.accuracy(), 0.0);
        assert_eq!(got.f1(), 0.0);
    }

    #[test]
    fn shared_matrix_from_threads() {
        use super::SharedConfusionMatrix;
        use crate::database::Family;

        let matrix = SharedConfusionMatrix::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        matrix.update(Family::Hevein, Family::Hevein);
                    }
                });
            }
        });

        let got = matrix.into_inner();
        assert_eq!(got.get(Family::Hevein, Family::Hevein), 100);
    }

    #[test]
    fn holdout_pattern() {
        use super::CrossValidation;

        let cv = CrossValidation::default();
        let held_out: Vec<usize> = (0..20).filter(|idx| cv.is_held_out(*idx, 0)).collect();
        assert_eq!(held_out, vec![7, 15]);

        let held_out: Vec<usize> = (0..20).filter(|idx| cv.is_held_out(*idx, 1)).collect();
        assert_eq!(held_out, vec![0, 8, 16]);
    }

    #[test]
    fn run_cross_validation() {
        use super::CrossValidation;
        use super::write_report;
        use crate::alphabet::AlphabetTable;
        use crate::database::DatabaseConfig;
        use crate::database::Family;
        use crate::database::ProfileDatabase;
        use crate::sequence::SequenceRecord;
        use indexmap::IndexMap;

        let table = AlphabetTable::builtin().unwrap();
        let template = ProfileDatabase::new(&DatabaseConfig::default(), &table).unwrap();

        let mut families: IndexMap<Family, Vec<SequenceRecord>> = IndexMap::new();
        families.insert(Family::Magainin, vec![
            SequenceRecord::protein("m1", b"GIGKFLHSAGKFGKAFVGEIMKS"),
            SequenceRecord::protein("m2", b"GIGKFLHSAKKFGKAFVGEIMNS"),
        ]);
        families.insert(Family::Temporin, vec![
            SequenceRecord::protein("t1", b"FLPLIGRVLSGIL"),
            SequenceRecord::protein("t2", b"LLPIVGNLLKSLL"),
        ]);

        let cv = CrossValidation { folds: 2, rounds: 2, threads: 1 };
        let report = cv.run(&template, &families).unwrap();

        // Every sequence is tested once over the two rounds.
        assert_eq!(report.matrix.total(), 4);
        assert_eq!(report.families[0].samples, 2);
        assert_eq!(report.families[1].average_length, 13.0);

        let mut out: Vec<u8> = Vec::new();
        write_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3 + Family::COUNT);
        assert!(text.lines().any(|x| x.starts_with("Magainin\t")));
    }

    #[test]
    fn thread_count_does_not_change_report() {
        use super::CrossValidation;
        use crate::alphabet::AlphabetTable;
        use crate::database::DatabaseConfig;
        use crate::database::Family;
        use crate::database::ProfileDatabase;
        use crate::sequence::SequenceRecord;
        use indexmap::IndexMap;

        let table = AlphabetTable::builtin().unwrap();
        let template = ProfileDatabase::new(&DatabaseConfig::default(), &table).unwrap();

        let mut families: IndexMap<Family, Vec<SequenceRecord>> = IndexMap::new();
        families.insert(Family::Magainin, vec![
            SequenceRecord::protein("m1", b"GIGKFLHSAGKFGKAFVGEIMKS"),
            SequenceRecord::protein("m2", b"GIGKFLHSAKKFGKAFVGEIMNS"),
            SequenceRecord::protein("m3", b"GIGKFLHSAKKFGKAFVGEIMKS"),
        ]);
        families.insert(Family::Temporin, vec![
            SequenceRecord::protein("t1", b"FLPLIGRVLSGIL"),
            SequenceRecord::protein("t2", b"LLPIVGNLLKSLL"),
            SequenceRecord::protein("t3", b"FVQWFSKFLGRIL"),
        ]);
        families.insert(Family::Aurein, vec![
            SequenceRecord::protein("a1", b"GLFDIIKKIAESF"),
            SequenceRecord::protein("a2", b"GLFDIVKKVVGAF"),
        ]);

        let serial = CrossValidation { folds: 2, rounds: 2, threads: 1 };
        let parallel = CrossValidation { threads: 4, ..serial };

        let expected = serial.run(&template, &families).unwrap();
        let got = parallel.run(&template, &families).unwrap();

        assert_eq!(got.matrix.total(), 8);
        assert_eq!(got, expected);
    }
}
