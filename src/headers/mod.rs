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

//! Headers used in the database format.
//!
//! An encoded [ProfileDatabase](crate::database::ProfileDatabase) consists
//! of a [FileHeader](file::FileHeader) and [FileFlags](file::FileFlags)
//! followed by one block per family profile. Each block starts with a
//! [BlockHeader](block::BlockHeader), which is followed by the deflated
//! profile entries and the [BlockFlags](block::BlockFlags).
//!
//! ## File header and flags
//!
//! ### FileHeader
//!
//! An encoded FileHeader is always 32 bytes long and contains:
//!
//! - A magic number identifying ampseed databases.
//! - Format version.
//! - Number of profile blocks.
//! - Length of the FileFlags block (bytes).
//!
//! ### FileFlags
//!
//! Variable length, contains the configuration shared by all profiles:
//!
//! - Alphabet identifier and residue classes.
//! - Seed patterns and their masks.
//! - Distance and the number of ranks it compares.
//!
//! ## Block header and flags
//!
//! ### BlockHeader
//!
//! An encoded BlockHeader is always 32 bytes long and contains:
//!
//! - Number of entries in the profile.
//! - Length of the deflated block (bytes).
//! - Length of the inflated entries (bytes). The BlockFlags follow them.
//! - Length of the BlockFlags (bytes).
//! - Number of distinct k-mers in the profile.
//! - Number of buckets in the profile.
//!
//! ### BlockFlags
//!
//! - Family name.
//! - Load factor of the profile.
//!

pub mod block;
pub mod file;
