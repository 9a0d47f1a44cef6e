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

//! Reduced amino acid alphabets.
//!
//! An [Alphabet] maps each of the 20 canonical residues to a class code in
//! `0..symbol_count`. Alphabets are collected in an [AlphabetTable], which
//! is read from a plain text table with one alphabet per line:
//!
//! ```text
//! murphy-4	LVIMC AGSTP FYW EDNQKRH
//! ```
//!
//! The first field is the identifier and the remaining fields are the
//! residue classes. The position of a class on the line is its code. The
//! table shipped with ampseed is available through [AlphabetTable::builtin].
//!
use std::io::BufRead;

use indexmap::IndexMap;

use crate::error::Error;
use crate::error::Result;

/// The 20 canonical amino acids.
pub const CANONICAL_RESIDUES: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

const BUILTIN_TABLE: &str = include_str!("../../data/alphabets.tsv");

/// An injective mapping from the canonical residues to class codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    id: String,
    // Indexed by `symbol - b'A'`.
    codes: [Option<u8>; 26],
    symbol_count: u8,
}

impl Alphabet {
    /// Build an alphabet from residue classes, eg. `["LVIMC", "AGSTP", "FYW", "EDNQKRH"]`.
    ///
    /// Residues in `groups[i]` encode to `i`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidAlphabet] if a residue is not canonical,
    /// appears twice, is missing, or if there are fewer than 2 or more than
    /// 20 classes.
    ///
    pub fn from_groups<S: AsRef<str>>(
        id: &str,
        groups: &[S],
    ) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidAlphabet { id: id.to_string(), reason };

        if groups.len() > u8::MAX as usize {
            return Err(invalid(format!("{} classes", groups.len())));
        }

        let mut codes: [Option<u8>; 26] = [None; 26];
        for (code, group) in groups.iter().enumerate() {
            let group = group.as_ref();
            if group.is_empty() {
                return Err(invalid(format!("class {} is empty", code)));
            }
            for symbol in group.bytes() {
                let symbol = symbol.to_ascii_uppercase();
                if !CANONICAL_RESIDUES.contains(&symbol) {
                    return Err(invalid(format!("'{}' is not a canonical residue", symbol as char)));
                }
                let slot = &mut codes[(symbol - b'A') as usize];
                if slot.is_some() {
                    return Err(invalid(format!("'{}' appears more than once", symbol as char)));
                }
                *slot = Some(code as u8);
            }
        }

        Self::from_codes(id, codes)
    }

    /// Build an alphabet from a code table indexed by `symbol - b'A'`.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidAlphabet] if the table does not cover exactly
    /// the canonical residues, or the codes are not contiguous from zero.
    ///
    pub fn from_codes(
        id: &str,
        codes: [Option<u8>; 26],
    ) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidAlphabet { id: id.to_string(), reason };

        let mut used = [false; 256];
        for (idx, code) in codes.iter().enumerate() {
            let symbol = b'A' + idx as u8;
            match (CANONICAL_RESIDUES.contains(&symbol), code) {
                (true, Some(code)) => used[*code as usize] = true,
                (true, None) => return Err(invalid(format!("residue '{}' is not mapped", symbol as char))),
                (false, Some(_)) => return Err(invalid(format!("'{}' is not a canonical residue", symbol as char))),
                (false, None) => (),
            }
        }

        let symbol_count = used.iter().take_while(|x| **x).count();
        if used[symbol_count..].iter().any(|x| *x) {
            return Err(invalid("class codes are not contiguous".to_string()));
        }
        if !(2..=20).contains(&symbol_count) {
            return Err(invalid(format!("{} classes, expected 2 to 20", symbol_count)));
        }

        Ok(Alphabet { id: id.to_string(), codes, symbol_count: symbol_count as u8 })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of distinct class codes.
    pub fn symbol_count(&self) -> u8 {
        self.symbol_count
    }

    pub fn codes(&self) -> &[Option<u8>; 26] {
        &self.codes
    }

    /// Class code of an upper case `symbol`, or None if it is not a canonical residue.
    pub fn encode(&self, symbol: u8) -> Option<u8> {
        let idx = symbol.wrapping_sub(b'A') as usize;
        if idx < self.codes.len() { self.codes[idx] } else { None }
    }

    /// Residue classes ordered by code.
    pub fn groups(&self) -> Vec<String> {
        let mut groups = vec![String::new(); self.symbol_count as usize];
        for symbol in CANONICAL_RESIDUES {
            if let Some(code) = self.encode(*symbol) {
                groups[code as usize].push(*symbol as char);
            }
        }
        groups
    }

    /// Format as a line of the alphabet table.
    pub fn to_table_line(&self) -> String {
        format!("{}\t{}", self.id, self.groups().join(" "))
    }
}

/// Map `symbol` to its class code in `alphabet`.
///
/// Returns None for anything that is not an upper case canonical residue,
/// including gaps and ambiguity codes.
///
pub fn encode_symbol(
    symbol: u8,
    alphabet: &Alphabet,
) -> Option<u8> {
    alphabet.encode(symbol)
}

/// Alphabets keyed by identifier, in table order.
#[derive(Clone, Debug, Default)]
pub struct AlphabetTable {
    alphabets: IndexMap<String, Alphabet>,
}

impl AlphabetTable {
    /// The alphabets shipped with ampseed.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_TABLE.as_bytes())
    }

    /// Read a table of alphabets.
    ///
    /// Empty lines and lines starting with `#` are skipped.
    ///
    /// ## Errors
    ///
    /// Returns [Error::InvalidAlphabet] for lines that fail validation or
    /// repeat an identifier, and [Error::Io] if reading fails.
    ///
    pub fn parse<R: BufRead>(
        conn: R,
    ) -> Result<Self> {
        let mut table = AlphabetTable::default();
        for line in conn.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let id = fields.next().unwrap_or_default();
            let groups: Vec<&str> = fields.collect();
            let alphabet = Alphabet::from_groups(id, &groups)?;

            if table.alphabets.contains_key(id) {
                return Err(Error::InvalidAlphabet { id: id.to_string(), reason: "duplicate identifier".to_string() });
            }
            table.insert(alphabet);
        }
        Ok(table)
    }

    /// Add or replace an alphabet.
    pub fn insert(&mut self, alphabet: Alphabet) {
        self.alphabets.insert(alphabet.id.clone(), alphabet);
    }

    /// ## Errors
    ///
    /// Returns [Error::UnknownAlphabet] if there is no alphabet named `id`.
    ///
    pub fn get(&self, id: &str) -> Result<&Alphabet> {
        self.alphabets.get(id).ok_or_else(|| Error::UnknownAlphabet(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alphabet> {
        self.alphabets.values()
    }

    pub fn len(&self) -> usize {
        self.alphabets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphabets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn builtin_table_validates() {
        use super::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();

        assert_eq!(table.len(), 46);
        assert_eq!(table.iter().next().unwrap().id(), "polar-hydrophobic-2");
        table.iter().for_each(|alphabet| {
            let expected = alphabet.id().rsplit('-').next().unwrap().parse::<u8>().unwrap();
            assert_eq!(alphabet.symbol_count(), expected);
        });
    }

    #[test]
    fn encode_murphy_10() {
        use super::AlphabetTable;
        use super::encode_symbol;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-10").unwrap();

        // A C G H P LVIM ST FYW EDNQ KR
        assert_eq!(encode_symbol(b'A', alphabet), Some(0));
        assert_eq!(encode_symbol(b'L', alphabet), Some(5));
        assert_eq!(encode_symbol(b'V', alphabet), Some(5));
        assert_eq!(encode_symbol(b'R', alphabet), Some(9));
        assert_eq!(encode_symbol(b'X', alphabet), None);
        assert_eq!(encode_symbol(b'-', alphabet), None);
        assert_eq!(encode_symbol(b'l', alphabet), None);
    }

    #[test]
    fn groups_round_trip_through_table_line() {
        use super::AlphabetTable;

        let table = AlphabetTable::builtin().unwrap();
        let alphabet = table.get("murphy-4").unwrap();

        let got = alphabet.to_table_line();
        let expected = "murphy-4\tCILMV AGPST FWY DEHKNQR".to_string();

        assert_eq!(got, expected);
    }

    #[test]
    fn reject_missing_residue() {
        use super::Alphabet;
        use crate::error::Error;

        let got = Alphabet::from_groups("broken", &["LVIMC", "AGSTP", "FYW", "EDNQKR"]);

        assert!(matches!(got, Err(Error::InvalidAlphabet { .. })));
    }

    #[test]
    fn reject_repeated_residue() {
        use super::Alphabet;
        use crate::error::Error;

        let got = Alphabet::from_groups("broken", &["LVIMCA", "AGSTP", "FYW", "EDNQKRH"]);

        assert!(matches!(got, Err(Error::InvalidAlphabet { .. })));
    }

    #[test]
    fn reject_single_class() {
        use super::Alphabet;
        use crate::error::Error;

        let got = Alphabet::from_groups("broken", &["ACDEFGHIKLMNPQRSTVWY"]);

        assert!(matches!(got, Err(Error::InvalidAlphabet { .. })));
    }

    #[test]
    fn reject_duplicate_identifier() {
        use super::AlphabetTable;
        use std::io::Cursor;

        let data = b"a\tAGTSNQDEHRKP CMFILVWY\na\tCMFILVWY ATHGPRDESNQK\n";
        let got = AlphabetTable::parse(Cursor::new(data));

        assert!(got.is_err());
    }

    #[test]
    fn parse_skips_comments() {
        use super::AlphabetTable;
        use std::io::Cursor;

        let data = b"# comment\n\nwang-2\tCMFILVWY ATHGPRDESNQK\n";
        let table = AlphabetTable::parse(Cursor::new(data)).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("wang-2").unwrap().symbol_count(), 2);
        assert!(table.get("wang-3").is_err());
    }
}
