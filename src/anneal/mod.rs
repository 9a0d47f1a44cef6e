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

//! Searching for a reduced alphabet by simulated annealing.
//!
//! Starting from a [CandidateAlphabet], the [Annealer] repeatedly mutates
//! the current candidate and scores it, usually with
//! [cross_validated_mcc]. Improvements are always accepted and worse
//! candidates with probability `exp(delta / temperature)`.
//!
//! ## Usage
//!
//! ```rust
//! use ampseed::anneal::Annealer;
//! use ampseed::anneal::CandidateAlphabet;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let initial = CandidateAlphabet::random(4, &mut rng).unwrap();
//!
//! // Reward alphabets that put 'I' and 'L' in the same class.
//! let annealer = Annealer { max_temperature: 5, transitions: 20, target: 0.5 };
//! let outcome = annealer.run("search-4", initial, |x| {
//!     Ok(if x.encode(b'I') == x.encode(b'L') { 1.0 } else { 0.0 })
//! }, &mut rng).unwrap();
//!
//! assert!(outcome.score <= 1.0);
//! assert_eq!(outcome.best.to_alphabet("search-4").unwrap().symbol_count(), 4);
//! ```
//!
use indexmap::IndexMap;
use rand::Rng;

use crate::alphabet::Alphabet;
use crate::database::DatabaseConfig;
use crate::database::Family;
use crate::database::ProfileDatabase;
use crate::error::Result;
use crate::kmer::seed::SeedSet;
use crate::sequence::SequenceRecord;
use crate::validate::CrossValidation;

pub mod candidate;

pub use candidate::CandidateAlphabet;

/// Cooling schedule and stopping score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annealer {
    pub max_temperature: u32,
    /// Candidates tried at each temperature.
    pub transitions: u32,
    /// Stop once the best score exceeds this.
    pub target: f64,
}

impl Default for Annealer {
    fn default() -> Self {
        Annealer { max_temperature: 30, transitions: 100, target: 0.99 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnealOutcome {
    pub best: CandidateAlphabet,
    pub score: f64,
    pub evaluations: usize,
}

impl Annealer {
    /// Anneal from `initial`, scoring candidates with `evaluate`.
    ///
    /// Candidates are converted with [CandidateAlphabet::to_alphabet] using
    /// `id`. The temperature falls from `max_temperature` to 1.
    ///
    /// ## Errors
    ///
    /// Returns the first error from `evaluate`.
    ///
    pub fn run<R, F>(
        &self,
        id: &str,
        initial: CandidateAlphabet,
        mut evaluate: F,
        rng: &mut R,
    ) -> Result<AnnealOutcome>
    where
        R: Rng + ?Sized,
        F: FnMut(&Alphabet) -> Result<f64>,
    {
        let mut parent = initial;
        let mut parent_score = evaluate(&parent.to_alphabet(id)?)?;
        let mut evaluations: usize = 1;
        log::info!("Initial score: {:.4}", parent_score);

        let mut best = parent.clone();
        let mut best_score = parent_score;

        'cooling: for temperature in (1..=self.max_temperature).rev() {
            log::info!("Temperature {}, best score {:.4}", temperature, best_score);
            for _ in 0..self.transitions {
                if best_score > self.target {
                    break 'cooling;
                }

                let mut child = parent.clone();
                child.mutate(rng);
                let child_score = evaluate(&child.to_alphabet(id)?)?;
                evaluations += 1;

                let delta = child_score - parent_score;
                if delta > 0.0 || (delta / temperature as f64).exp() > rng.gen::<f64>() {
                    parent = child;
                    parent_score = child_score;
                }

                if parent_score > best_score {
                    best = parent.clone();
                    best_score = parent_score;
                    log::debug!("Best score now {:.4}", best_score);
                }
            }
        }

        Ok(AnnealOutcome { best, score: best_score, evaluations })
    }
}

/// Multi-class MCC of a database using `alphabet` under `validation`.
///
/// Seeds and distance are taken from `config`, its alphabet is ignored.
///
pub fn cross_validated_mcc(
    alphabet: &Alphabet,
    families: &IndexMap<Family, Vec<SequenceRecord>>,
    config: &DatabaseConfig,
    validation: &CrossValidation,
) -> Result<f64> {
    let seeds = SeedSet::new(&config.seed_patterns, alphabet)?;
    let template = ProfileDatabase::with_alphabet(alphabet.clone(), seeds, config.distance, config.load_factor)?;
    let report = validation.run(&template, families)?;
    Ok(report.matrix.mcc())
}
