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

//! Spaced seeds.
//!
//! A spaced seed such as `110101` marks the residues of a k-mer that must
//! agree (`1`) and the ones that may differ (`0`). Seeds are converted into
//! bit masks with the same slot width as the k-mers they are applied to, so
//! two k-mers match under a seed when `a & mask == b & mask`.
//!
use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::error::Result;
use crate::kmer::block_size;
use crate::kmer::shift_width;

/// Seeds used when none are given.
pub const DEFAULT_SEEDS: [&str; 6] = [
    "110110101000111",
    "110101100010111",
    "110110010100111",
    "1101100011010111",
    "1110010100110111",
    "111101011101111",
];

/// Convert `pattern` into a k-mer mask for `alphabet`.
///
/// The last character of the pattern covers the most recent residue.
///
/// ## Errors
///
/// Returns [Error::InvalidSeedPattern] if the pattern is empty or contains
/// something other than `0` and `1`, and [Error::SeedTooLong] if it is
/// longer than [block_size].
///
/// ## Usage
///
/// ```rust
/// use ampseed::alphabet::AlphabetTable;
/// use ampseed::kmer::seed::encode_seed;
///
/// let table = AlphabetTable::builtin().unwrap();
/// let alphabet = table.get("murphy-10").unwrap();
///
/// // 4 bits per residue
/// let mask = encode_seed("1101", alphabet).unwrap();
/// assert_eq!(mask, 0xff0f);
/// ```
///
pub fn encode_seed(
    pattern: &str,
    alphabet: &Alphabet,
) -> Result<u64> {
    if pattern.is_empty() || pattern.bytes().any(|x| x != b'0' && x != b'1') {
        return Err(Error::InvalidSeedPattern(pattern.to_string()));
    }

    let block_size = block_size(alphabet);
    if pattern.len() > block_size {
        return Err(Error::SeedTooLong { length: pattern.len(), block_size });
    }

    let shift = shift_width(alphabet);
    let slot: u64 = (1 << shift) - 1;
    let mask = pattern.bytes().fold(0_u64, |mask, x| {
        if x == b'1' { (mask << shift) | slot } else { mask << shift }
    });

    Ok(mask)
}

/// Convert every pattern that fits `alphabet` into a mask.
///
/// Patterns longer than [block_size] are dropped, so the result may be
/// shorter than `patterns`.
///
/// ## Errors
///
/// Returns [Error::InvalidSeedPattern] if a pattern is malformed.
///
pub fn encode_all_seeds<S: AsRef<str>>(
    patterns: &[S],
    alphabet: &Alphabet,
) -> Result<Vec<u64>> {
    let mut masks: Vec<u64> = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        match encode_seed(pattern.as_ref(), alphabet) {
            Ok(mask) => masks.push(mask),
            Err(Error::SeedTooLong { length, block_size }) => {
                log::debug!("Dropped seed {} ({} > {} residues for {})", pattern.as_ref(), length, block_size, alphabet.id());
            },
            Err(e) => return Err(e),
        }
    }
    Ok(masks)
}

/// The seeds in effect for an alphabet, with their masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSet {
    patterns: Vec<String>,
    masks: Vec<u64>,
}

impl SeedSet {
    /// Keep the patterns that fit `alphabet`.
    ///
    /// If none of them fit, a solid seed spanning the whole k-mer is used
    /// instead.
    ///
    pub fn new<S: AsRef<str>>(
        patterns: &[S],
        alphabet: &Alphabet,
    ) -> Result<Self> {
        let mut kept: Vec<String> = Vec::with_capacity(patterns.len());
        let mut masks: Vec<u64> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let mask = encode_all_seeds(&[pattern], alphabet)?;
            if let Some(mask) = mask.first() {
                kept.push(pattern.to_string());
                masks.push(*mask);
            }
        }

        if masks.is_empty() {
            let solid = "1".repeat(block_size(alphabet));
            log::warn!("No seeds fit alphabet {}, using {}", alphabet.id(), solid);
            masks.push(encode_seed(&solid, alphabet)?);
            kept.push(solid);
        }

        Ok(SeedSet { patterns: kept, masks })
    }

    /// [DEFAULT_SEEDS] for `alphabet`.
    pub fn default_for(alphabet: &Alphabet) -> Result<Self> {
        Self::new(&DEFAULT_SEEDS, alphabet)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn masks(&self) -> &[u64] {
        &self.masks
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn encode_seed_masks_wildcards() {
        use super::encode_seed;
        use crate::alphabet::AlphabetTable;
        use crate::kmer::encode_sequence_to_vec;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-10").unwrap();

        let mask = encode_seed("101", alphabet).unwrap();
        assert_eq!(mask, 0x0f0f);

        // G L K and G C K differ only in the wildcard position.
        let a = encode_sequence_to_vec(b"GLK", alphabet)[0];
        let b = encode_sequence_to_vec(b"GCK", alphabet)[0];
        let c = encode_sequence_to_vec(b"ALK", alphabet)[0];

        assert_ne!(a, b);
        assert_eq!(a & mask, b & mask);
        assert_ne!(a & mask, c & mask);
    }

    #[test]
    fn encode_seed_too_long() {
        use super::encode_seed;
        use crate::alphabet::AlphabetTable;
        use crate::error::Error;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("iupac-20").unwrap();

        let got = encode_seed("1111111111111", alphabet);

        assert!(matches!(got, Err(Error::SeedTooLong { length: 13, block_size: 12 })));
    }

    #[test]
    fn encode_seed_rejects_other_characters() {
        use super::encode_seed;
        use crate::alphabet::AlphabetTable;
        use crate::error::Error;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-10").unwrap();

        assert!(matches!(encode_seed("1x1", alphabet), Err(Error::InvalidSeedPattern(_))));
        assert!(matches!(encode_seed("", alphabet), Err(Error::InvalidSeedPattern(_))));
    }

    #[test]
    fn encode_all_seeds_drops_long_seeds() {
        use super::encode_all_seeds;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("iupac-20").unwrap();

        let patterns = vec!["111".to_string(), "1".repeat(13), "11011".to_string()];
        let got = encode_all_seeds(&patterns, alphabet).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0], 0x7fff);
    }

    #[test]
    fn default_seeds_fit_murphy_10() {
        use super::SeedSet;
        use super::DEFAULT_SEEDS;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-10").unwrap();

        let seeds = SeedSet::default_for(alphabet).unwrap();

        assert_eq!(seeds.len(), DEFAULT_SEEDS.len());
        assert_eq!(seeds.patterns()[3], "1101100011010111");
    }

    #[test]
    fn seed_set_falls_back_to_solid_seed() {
        use super::SeedSet;
        use crate::alphabet::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("iupac-20").unwrap();

        let seeds = SeedSet::default_for(alphabet).unwrap();

        assert_eq!(seeds.patterns(), &["111111111111".to_string()]);
        assert_eq!(seeds.masks(), &[(1_u64 << 60) - 1]);
    }
}
