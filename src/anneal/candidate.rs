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
use rand::seq::SliceRandom;
use rand::Rng;

use crate::alphabet::Alphabet;
use crate::alphabet::CANONICAL_RESIDUES;
use crate::error::Error;
use crate::error::Result;

const N_ROWS: usize = CANONICAL_RESIDUES.len();

/// A mutable assignment of the canonical residues to classes.
///
/// Rows are `(residue, class)` pairs. Mutations move residues or classes
/// between rows without changing how many residues each class holds.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateAlphabet {
    rows: [(u8, u8); N_ROWS],
}

impl CandidateAlphabet {
    /// Random assignment using every class in `0..partitions`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidAlphabet] unless `partitions` is in `2..=20`.
    ///
    pub fn random<R: Rng + ?Sized>(
        partitions: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if !(2..=N_ROWS).contains(&partitions) {
            return Err(Error::InvalidAlphabet { id: "random".to_string(), reason: format!("{} classes, expected 2 to 20", partitions) });
        }

        let mut symbols: Vec<u8> = CANONICAL_RESIDUES.to_vec();
        symbols.shuffle(rng);

        let mut rows = [(0, 0); N_ROWS];
        for (idx, symbol) in symbols.into_iter().enumerate() {
            let class = if idx < partitions { idx } else { rng.gen_range(0..partitions) };
            rows[idx] = (symbol, class as u8);
        }
        Ok(CandidateAlphabet { rows })
    }

    pub fn from_alphabet(
        alphabet: &Alphabet,
    ) -> Self {
        let mut rows = [(0, 0); N_ROWS];
        for (idx, symbol) in CANONICAL_RESIDUES.iter().enumerate() {
            // Alphabets cover every canonical residue.
            rows[idx] = (*symbol, alphabet.encode(*symbol).unwrap_or(0));
        }
        CandidateAlphabet { rows }
    }

    /// Build an [Alphabet] with classes renumbered from zero in ascending order.
    pub fn to_alphabet(
        &self,
        id: &str,
    ) -> Result<Alphabet> {
        let mut used = [false; 256];
        self.rows.iter().for_each(|(_, class)| used[*class as usize] = true);

        let mut renumbered = [0u8; 256];
        let mut next: u8 = 0;
        for (class, is_used) in used.iter().enumerate() {
            if *is_used {
                renumbered[class] = next;
                next += 1;
            }
        }

        let mut codes: [Option<u8>; 26] = [None; 26];
        self.rows.iter().for_each(|(symbol, class)| {
            codes[(symbol - b'A') as usize] = Some(renumbered[*class as usize]);
        });
        Alphabet::from_codes(id, codes)
    }

    pub fn rows(&self) -> &[(u8, u8)] {
        &self.rows
    }

    /// Apply one random mutation.
    ///
    /// Swaps the residues of two rows 90% of the time, the classes of two
    /// rows 6%, and reverses the class or residue column 2% each.
    ///
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) {
        match rng.gen_range(1..=100) {
            1..=6 => {
                let (a, b) = (rng.gen_range(0..N_ROWS), rng.gen_range(0..N_ROWS));
                self.swap_class_pair(a, b);
            },
            7..=8 => self.reverse_classes(),
            9..=10 => self.reverse_symbols(),
            _ => {
                let (a, b) = (rng.gen_range(0..N_ROWS), rng.gen_range(0..N_ROWS));
                self.swap_symbol_pair(a, b);
            },
        }
    }

    pub fn swap_symbol_pair(
        &mut self,
        a: usize,
        b: usize,
    ) {
        let tmp = self.rows[a].0;
        self.rows[a].0 = self.rows[b].0;
        self.rows[b].0 = tmp;
    }

    pub fn swap_class_pair(
        &mut self,
        a: usize,
        b: usize,
    ) {
        let tmp = self.rows[a].1;
        self.rows[a].1 = self.rows[b].1;
        self.rows[b].1 = tmp;
    }

    pub fn reverse_symbols(&mut self) {
        let mut symbols: Vec<u8> = self.rows.iter().map(|x| x.0).collect();
        symbols.reverse();
        self.rows.iter_mut().zip(symbols).for_each(|(row, symbol)| row.0 = symbol);
    }

    pub fn reverse_classes(&mut self) {
        let mut classes: Vec<u8> = self.rows.iter().map(|x| x.1).collect();
        classes.reverse();
        self.rows.iter_mut().zip(classes).for_each(|(row, class)| row.1 = class);
    }
}

#[cfg(test)]
mod tests {
    use super::CandidateAlphabet;

    fn sorted_classes(candidate: &CandidateAlphabet) -> Vec<u8> {
        let mut classes: Vec<u8> = candidate.rows().iter().map(|x| x.1).collect();
        classes.sort();
        classes
    }

    #[test]
    fn random_uses_every_class() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(12);
        let candidate = CandidateAlphabet::random(12, &mut rng).unwrap();
        let got = candidate.to_alphabet("random-12").unwrap();

        assert_eq!(got.symbol_count(), 12);
        assert!(CandidateAlphabet::random(1, &mut rng).is_err());
        assert!(CandidateAlphabet::random(21, &mut rng).is_err());
    }

    #[test]
    fn mutations_preserve_class_sizes() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(3);
        let mut candidate = CandidateAlphabet::random(6, &mut rng).unwrap();
        let expected = sorted_classes(&candidate);

        for _ in 0..500 {
            candidate.mutate(&mut rng);
            assert_eq!(sorted_classes(&candidate), expected);
            assert_eq!(candidate.to_alphabet("x").unwrap().symbol_count(), 6);
        }
    }

    #[test]
    fn reverse_and_swap() {
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let murphy = table.get("murphy-10").unwrap();
        let mut candidate = CandidateAlphabet::from_alphabet(murphy);

        assert_eq!(&candidate.to_alphabet("murphy-10").unwrap(), murphy);

        candidate.reverse_symbols();
        candidate.reverse_symbols();
        assert_eq!(&candidate.to_alphabet("murphy-10").unwrap(), murphy);

        // Rows are in canonical order, 'A' and 'C' are in different classes.
        candidate.swap_symbol_pair(0, 1);
        let got = candidate.to_alphabet("murphy-10").unwrap();
        assert_eq!(got.encode(b'A'), murphy.encode(b'C'));
        assert_eq!(got.encode(b'C'), murphy.encode(b'A'));
    }
}
