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

//! Reading sequences from fasta or fastq files.
//!
//! Training data is organised as one file per family, named after the
//! family, eg. `Temporin.fasta`. See [read_family_dir].
//!
use std::io::Read;
use std::path::Path;

use bstr::ByteSlice;
use indexmap::IndexMap;

use crate::database::Family;
use crate::error::Result;

/// What the residues of a [SequenceRecord] are.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceType {
    Nucleotide,
    #[default]
    Protein,
}

impl std::str::FromStr for SequenceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "nucleotide" | "dna" => Ok(SequenceType::Nucleotide),
            "protein" => Ok(SequenceType::Protein),
            _ => Err(format!("'{}' is not a valid SequenceType", s)),
        }
    }
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::Nucleotide => write!(f, "nucleotide"),
            SequenceType::Protein => write!(f, "protein"),
        }
    }
}

/// A named sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    /// Upper case residues without stop codons.
    pub residues: Vec<u8>,
    pub kind: SequenceType,
}

impl SequenceRecord {
    pub fn new(
        name: &str,
        residues: &[u8],
        kind: SequenceType,
    ) -> Self {
        let residues = residues.iter()
                               .filter(|x| **x != b'*')
                               .map(|x| x.to_ascii_uppercase())
                               .collect();
        SequenceRecord { name: name.to_string(), residues, kind }
    }

    pub fn protein(
        name: &str,
        residues: &[u8],
    ) -> Self {
        Self::new(name, residues, SequenceType::Protein)
    }
}

/// Read all records from fasta or fastq data, optionally gzipped.
///
/// ## Usage
///
/// ```rust
/// use ampseed::sequence::read_sequences;
/// use ampseed::sequence::SequenceType;
/// use std::io::Cursor;
///
/// let data = b">temporin-a\nFLPLIGRVLSGIL\n>aurein-1.1\nglfdiikkiaesf*\n".to_vec();
/// let records = read_sequences(Cursor::new(data), SequenceType::Protein).unwrap();
///
/// assert_eq!(records[0].name, "temporin-a");
/// assert_eq!(records[1].residues, b"GLFDIIKKIAESF".to_vec());
/// ```
///
pub fn read_sequences<R: Read + Send>(
    conn: R,
    kind: SequenceType,
) -> Result<Vec<SequenceRecord>> {
    let mut reader = needletail::parse_fastx_reader(conn)?;
    let mut records: Vec<SequenceRecord> = Vec::new();
    while let Some(record) = reader.next() {
        let record = record?;
        records.push(SequenceRecord::new(&record.id().to_str_lossy(), &record.seq(), kind));
    }
    Ok(records)
}

/// Read all records from a fasta or fastq file.
pub fn read_sequences_from_path(
    path: &Path,
    kind: SequenceType,
) -> Result<Vec<SequenceRecord>> {
    let mut reader = needletail::parse_fastx_file(path)?;
    let mut records: Vec<SequenceRecord> = Vec::new();
    while let Some(record) = reader.next() {
        let record = record?;
        records.push(SequenceRecord::new(&record.id().to_str_lossy(), &record.seq(), kind));
    }
    Ok(records)
}

/// Read `<dir>/<Family>.fasta` for every trainable family.
///
/// Families without a file are skipped.
///
pub fn read_family_dir(
    dir: &Path,
    kind: SequenceType,
) -> Result<IndexMap<Family, Vec<SequenceRecord>>> {
    let mut families: IndexMap<Family, Vec<SequenceRecord>> = IndexMap::new();
    for family in Family::trainable() {
        let path = dir.join(format!("{}.fasta", family));
        if !path.exists() {
            log::info!("No sequences for {} in {}", family, dir.display());
            continue;
        }
        let records = read_sequences_from_path(&path, kind)?;
        log::info!("Read {} {} sequences", records.len(), family);
        families.insert(family, records);
    }
    Ok(families)
}
