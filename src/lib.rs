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

//! ampseed is a library and a command-line client for classifying
//! antimicrobial peptides (AMPs) into families with k-mer profiles.
//!
//! Protein sequences are first rewritten in a reduced amino acid
//! [alphabet](alphabet::Alphabet) that groups residues with similar
//! properties. The reduced sequence is packed into overlapping 64-bit
//! [k-mers](kmer), and the k-mers of each family are counted in a
//! [MultiSeedStore](store::MultiSeedStore). Lookups in the store compare
//! k-mers under several spaced seeds, so that k-mers differing only at
//! wildcard positions are counted together.
//!
//! A query is classified by building its own store and scoring it against
//! every family profile in a [ProfileDatabase] with the configured
//! [Distance](distance::Distance).
//!
//! ## Usage
//!
//! ### Command line
//!
//! The ampseed CLI supports the following subcommands:
//!   - `ampseed build` train a database from one fasta file per family.
//!   - `ampseed classify` classify sequences against a database.
//!   - `ampseed validate` cross-validate an alphabet on training data.
//!   - `ampseed anneal` search for a reduced alphabet of a given size.
//!   - `ampseed alphabets` list the known alphabets.
//!
//! ### Rust API
//!
//! [train_database] and [classify_records] cover the common case. A
//! database can be saved with [save_database_to_write] and read back with
//! [load_database_from_read].
//!
//! For finer control, see [ProfileDatabase] and the
//! [Encoder](encoder::Encoder) and [Decoder](decoder::Decoder) structs,
//! which work on one profile at a time.
//!
//! ## File format
//!
//! See [headers].
//!
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;

pub mod alphabet;
pub mod anneal;
pub mod compression;
pub mod database;
pub mod decoder;
pub mod distance;
pub mod encoder;
pub mod error;
pub mod headers;
pub mod kmer;
pub mod sequence;
pub mod store;
pub mod validate;

pub use database::ClassificationResult;
pub use database::DatabaseConfig;
pub use database::Family;
pub use database::ProfileDatabase;
pub use error::Error;
pub use error::Result;

use alphabet::AlphabetTable;
use sequence::SequenceRecord;

/// Train a database with one profile per family in `families`.
///
/// ## Errors
///
/// Returns an error if `config` refers to an alphabet missing from `table`,
/// or if a record is not a protein sequence.
///
/// ## Usage
///
/// ```rust
/// use ampseed::{train_database, classify_records};
/// use ampseed::{DatabaseConfig, Family};
/// use ampseed::alphabet::AlphabetTable;
/// use ampseed::sequence::SequenceRecord;
/// use indexmap::IndexMap;
///
/// let mut families: IndexMap<Family, Vec<SequenceRecord>> = IndexMap::new();
/// families.insert(Family::Temporin, vec![
///     SequenceRecord::protein("temporin-a", b"FLPLIGRVLSGIL"),
///     SequenceRecord::protein("temporin-b", b"LLPIVGNLLKSLL"),
/// ]);
/// families.insert(Family::Magainin, vec![
///     SequenceRecord::protein("magainin-2", b"GIGKFLHSAKKFGKAFVGEIMNS"),
/// ]);
///
/// let table = AlphabetTable::builtin().unwrap();
/// let db = train_database(&DatabaseConfig::default(), &table, &families).unwrap();
///
/// let queries = vec![SequenceRecord::protein("query", b"GIGKFLHSAKKFGKAFVGEIMNS")];
/// let results = classify_records(&db, &queries).unwrap();
///
/// assert_eq!(results[0].family, Family::Magainin);
/// ```
///
pub fn train_database(
    config: &DatabaseConfig,
    table: &AlphabetTable,
    families: &IndexMap<Family, Vec<SequenceRecord>>,
) -> Result<ProfileDatabase> {
    let mut database = ProfileDatabase::new(config, table)?;
    for (family, records) in families {
        database.train(*family, records)?;
        log::info!("Trained {} from {} sequences", family, records.len());
    }
    Ok(database)
}

/// Best result for each record.
///
/// Records without any matching profile are reported as
/// [Family::Unknown] with a score of 0.
///
/// ## Errors
///
/// Returns [Error::InvalidSequenceType] if a record is not a protein.
///
pub fn classify_records(
    database: &ProfileDatabase,
    records: &[SequenceRecord],
) -> Result<Vec<ClassificationResult>> {
    records.iter().map(|record| {
        let results = database.classify_sequence(record)?;
        Ok(results.first().copied().unwrap_or(ClassificationResult { family: Family::Unknown, score: 0.0 }))
    }).collect()
}

/// Write `database` to something that implements [Write].
///
/// ## Usage
///
/// ```rust
/// use ampseed::{load_database_from_read, save_database_to_write};
/// use ampseed::{DatabaseConfig, Family, ProfileDatabase};
/// use ampseed::alphabet::AlphabetTable;
/// use std::io::{Cursor, Seek};
///
/// let table = AlphabetTable::builtin().unwrap();
/// let mut db = ProfileDatabase::new(&DatabaseConfig::default(), &table).unwrap();
/// db.add_profile(Family::Aurein, db.build_store(b"GLFDIIKKIAESF").unwrap()).unwrap();
/// db.add_profile(Family::Temporin, db.build_store(b"FLPLIGRVLSGIL").unwrap()).unwrap();
///
/// let mut bytes: Cursor<Vec<u8>> = Cursor::new(Vec::new());
/// save_database_to_write(&db, &mut bytes).unwrap();
///
/// bytes.rewind().unwrap();
/// let loaded = load_database_from_read(&mut bytes).unwrap();
///
/// let query = db.build_store(b"GLFDIIKKIAESF").unwrap();
/// assert_eq!(loaded.classify(&query), db.classify(&query));
/// assert_eq!(loaded, db);
/// ```
///
pub fn save_database_to_write<W: Write>(
    database: &ProfileDatabase,
    conn_out: &mut W,
) -> Result<()> {
    let mut encoder = encoder::Encoder::new(database);
    conn_out.write_all(&encoder.encode_header_and_flags()?)?;
    for block in encoder.by_ref() {
        conn_out.write_all(&block?)?;
    }
    conn_out.flush()?;
    Ok(())
}

/// Read a database from something that implements [Read].
///
/// ## Errors
///
/// Returns [Error::BadMagic] or [Error::UnsupportedVersion] if the data is
/// not an ampseed database this version can read, and
/// [Error::CorruptBlock] if a profile is inconsistent.
///
pub fn load_database_from_read<R: Read>(
    conn_in: &mut R,
) -> Result<ProfileDatabase> {
    let decoder = decoder::Decoder::new(conn_in)?;
    decoder.into_database()
}

pub fn save_database_to_path(
    database: &ProfileDatabase,
    path: &Path,
) -> Result<()> {
    let mut conn_out = BufWriter::new(File::create(path)?);
    save_database_to_write(database, &mut conn_out)
}

pub fn load_database_from_path(
    path: &Path,
) -> Result<ProfileDatabase> {
    let mut conn_in = BufReader::new(File::open(path)?);
    load_database_from_read(&mut conn_in)
}
