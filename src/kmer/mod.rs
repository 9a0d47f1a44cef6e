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

//! Packing residues into 64-bit k-mers.
//!
//! Each residue is encoded with [shift_width] bits, so a k-mer holds
//! [block_size] residues with the most recent residue in the lowest bits.
//! Residues that are not in the alphabet are skipped.
//!
use crate::alphabet::Alphabet;

pub mod seed;

/// Bits needed to store one class code of `alphabet`.
pub fn shift_width(alphabet: &Alphabet) -> u32 {
    let max_code = alphabet.symbol_count().saturating_sub(1).max(1);
    u8::BITS - max_code.leading_zeros()
}

/// Number of residues that fit in a 64-bit k-mer.
pub fn block_size(alphabet: &Alphabet) -> usize {
    (u64::BITS / shift_width(alphabet)) as usize
}

/// Iterator over the k-mers of a sequence.
///
/// Created with [encode_sequence].
///
pub struct Kmers<'a> {
    residues: std::slice::Iter<'a, u8>,
    alphabet: &'a Alphabet,

    shift: u32,
    block_size: usize,
    window_mask: u64,

    kmer: u64,
    filled: usize,
    emitted: bool,
}

impl Iterator for Kmers<'_> {
    type Item = u64;

    fn next(
        &mut self,
    ) -> Option<u64> {
        for symbol in self.residues.by_ref() {
            let Some(code) = self.alphabet.encode(*symbol) else {
                continue;
            };
            self.kmer = ((self.kmer << self.shift) | code as u64) & self.window_mask;
            self.filled += 1;
            if self.filled >= self.block_size {
                self.emitted = true;
                return Some(self.kmer);
            }
        }

        // Sequences shorter than a block still produce one k-mer.
        if !self.emitted && self.filled > 0 {
            self.emitted = true;
            return Some(self.kmer);
        }
        None
    }
}

/// Encode the overlapping k-mers of `residues`.
///
/// A sequence with N residues in the alphabet yields `N - block_size + 1`
/// k-mers, or exactly one if `N <= block_size`. Residues outside the
/// alphabet are skipped and do not count towards N.
///
/// Input must be upper case.
///
/// ## Usage
///
/// ```rust
/// use ampseed::alphabet::Alphabet;
/// use ampseed::kmer::encode_sequence;
///
/// // A, C, G and T get codes 0 to 3, everything else shares code 3.
/// let alphabet = Alphabet::from_groups("acgt", &["A", "C", "G", "TDEFHIKLMNPQRSVWY"]).unwrap();
///
/// let kmers: Vec<u64> = encode_sequence(b"ACGT", &alphabet).collect();
///
/// assert_eq!(kmers, vec![0b00_01_10_11]);
/// ```
///
pub fn encode_sequence<'a>(
    residues: &'a [u8],
    alphabet: &'a Alphabet,
) -> Kmers<'a> {
    let shift = shift_width(alphabet);
    let block_size = block_size(alphabet);
    let bits = shift as usize * block_size;
    let window_mask = if bits >= u64::BITS as usize { u64::MAX } else { (1_u64 << bits) - 1 };

    Kmers {
        residues: residues.iter(), alphabet,
        shift, block_size, window_mask,
        kmer: 0, filled: 0, emitted: false,
    }
}

/// Encode the k-mers of `residues` into a Vec.
pub fn encode_sequence_to_vec(
    residues: &[u8],
    alphabet: &Alphabet,
) -> Vec<u64> {
    encode_sequence(residues, alphabet).collect()
}

#[cfg(test)]
mod tests {
    fn acgt() -> crate::alphabet::Alphabet {
        crate::alphabet::Alphabet::from_groups("acgt", &["A", "C", "G", "TDEFHIKLMNPQRSVWY"]).unwrap()
    }

    #[test]
    fn widths_follow_symbol_count() {
        use super::block_size;
        use super::shift_width;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();

        let expected = vec![(1, 64), (2, 32), (3, 21), (4, 16), (5, 12)];
        let got: Vec<(u32, usize)> = ["wang-2", "li-4", "murphy-5", "murphy-10", "iupac-20"].iter().map(|id| {
            let alphabet = table.get(id).unwrap();
            (shift_width(alphabet), block_size(alphabet))
        }).collect();

        assert_eq!(got, expected);
    }

    #[test]
    fn window_count() {
        use super::encode_sequence_to_vec;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-10").unwrap();

        // block size is 16
        let seq = b"GLFDIVKKVVGALGSLGKKLLK";
        assert_eq!(encode_sequence_to_vec(seq, alphabet).len(), seq.len() - 16 + 1);
        assert_eq!(encode_sequence_to_vec(&seq[0..16], alphabet).len(), 1);
        assert_eq!(encode_sequence_to_vec(&seq[0..17], alphabet).len(), 2);
        assert_eq!(encode_sequence_to_vec(&seq[0..3], alphabet).len(), 1);
        assert_eq!(encode_sequence_to_vec(b"", alphabet).len(), 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        use super::encode_sequence_to_vec;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("li-5").unwrap();

        let seq = b"FLPLIGRVLSGILKKWGKRVRKLLSSKSEGS";
        let expected = encode_sequence_to_vec(seq, alphabet);
        let got = encode_sequence_to_vec(seq, alphabet);

        assert_eq!(got, expected);
    }

    #[test]
    fn rolling_window_drops_oldest_residue() {
        use super::encode_sequence_to_vec;

        let alphabet = acgt();
        // 33 residues with a 32 residue block: the leading C falls off.
        let mut seq = b"C".to_vec();
        seq.extend(std::iter::repeat(b'A').take(31));
        seq.push(b'G');

        let got = encode_sequence_to_vec(&seq, &alphabet);
        let expected = vec![1_u64 << 62, 2];

        assert_eq!(got, expected);
    }

    #[test]
    fn unknown_residues_are_skipped() {
        use super::encode_sequence_to_vec;

        let alphabet = acgt();

        let expected = encode_sequence_to_vec(b"AACC", &alphabet);
        let got = encode_sequence_to_vec(b"AAXCC", &alphabet);

        assert_eq!(got, expected);
        assert_eq!(got, vec![0b00_00_01_01]);
        assert!(encode_sequence_to_vec(b"XXBZ-", &alphabet).is_empty());
    }
}
