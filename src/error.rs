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

//! Errors returned by the ampseed API.

use crate::sequence::SequenceType;

/// Errors from encoding, training, classification and persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A sequence of the wrong type was given to the classifier.
    #[error("sequence '{name}' is {found}, expected protein")]
    InvalidSequenceType { name: String, found: SequenceType },

    /// A spaced seed does not fit in a 64-bit k-mer for the alphabet.
    ///
    /// Dropped by [encode_all_seeds](crate::kmer::seed::encode_all_seeds)
    /// and never returned from the top-level API.
    #[error("seed of length {length} exceeds block size {block_size}")]
    SeedTooLong { length: usize, block_size: usize },

    #[error("seed pattern '{0}' may only contain '0' and '1'")]
    InvalidSeedPattern(String),

    #[error("invalid alphabet '{id}': {reason}")]
    InvalidAlphabet { id: String, reason: String },

    #[error("no alphabet named '{0}'")]
    UnknownAlphabet(String),

    #[error("'{0}' is not a peptide family")]
    UnknownFamily(String),

    #[error("the Unknown family cannot be trained")]
    UntrainableFamily,

    #[error("load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),

    #[error("not an ampseed database (magic {0:#018x})")]
    BadMagic(u64),

    #[error("unsupported database version {0}")]
    UnsupportedVersion(u64),

    #[error("corrupt profile block: {0}")]
    CorruptBlock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    Fastx(#[from] needletail::errors::ParseError),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
