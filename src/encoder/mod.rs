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

//! Encoding a [ProfileDatabase] one profile at a time.

use crate::database::Family;
use crate::database::ProfileDatabase;
use crate::compression::deflate_bytes;
use crate::error::Error;
use crate::error::Result;
use crate::headers::block::BlockFlags;
use crate::headers::block::BlockHeader;
use crate::headers::block::StoredEntry;
use crate::headers::block::encode_block_flags;
use crate::headers::block::encode_block_header;
use crate::headers::block::encode_entries;
use crate::headers::file::FileFlags;
use crate::headers::file::FileHeader;
use crate::headers::file::MAGIC;
use crate::headers::file::VERSION;
use crate::headers::file::encode_file_flags;
use crate::headers::file::encode_file_header;
use crate::store::MultiSeedStore;

fn to_u32(
    len: usize,
    what: &str,
) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::CorruptBlock(format!("{} of length {} does not fit in a block", what, len)))
}

/// Encode a single profile as a block.
pub fn encode_profile(
    family: Family,
    store: &MultiSeedStore,
) -> Result<Vec<u8>> {
    let entries: Vec<StoredEntry> = store.iter().map(|(bucket, entry)| {
        StoredEntry { bucket: bucket as u64, key: entry.key, frequency: entry.frequency, seed: entry.seed }
    }).collect();

    let mut block = encode_entries(&entries)?;
    let block_len = block.len();
    let mut flags = encode_block_flags(&BlockFlags { family: family.to_string(), load_factor: store.load_factor() })?;
    let flags_len = flags.len();
    block.append(&mut flags);

    let mut deflated = deflate_bytes(&block)?;

    let header = BlockHeader {
        num_entries: to_u32(entries.len(), "entries")?,
        deflated_len: to_u32(deflated.len(), "deflated block")?,
        block_len: to_u32(block_len, "block")?,
        flags_len: to_u32(flags_len, "block flags")?,
        size: store.size() as u64,
        capacity: store.capacity() as u64,
    };

    let mut out = encode_block_header(&header)?;
    out.append(&mut deflated);
    Ok(out)
}

/// Iterator over the encoded profile blocks of a database.
///
/// The file header and flags are available from
/// [encode_header_and_flags](Encoder::encode_header_and_flags) and must be
/// written before the blocks.
///
pub struct Encoder<'a> {
    database: &'a ProfileDatabase,
    profiles: indexmap::map::Iter<'a, Family, MultiSeedStore>,
}

impl<'a> Encoder<'a> {
    pub fn new(
        database: &'a ProfileDatabase,
    ) -> Self {
        Encoder { database, profiles: database.profiles().iter() }
    }

    pub fn file_flags(&self) -> FileFlags {
        let alphabet = self.database.alphabet();
        let seeds = self.database.seeds();
        FileFlags {
            alphabet_id: alphabet.id().to_string(),
            alphabet_groups: alphabet.groups(),
            seed_patterns: seeds.patterns().to_vec(),
            masks: seeds.masks().to_vec(),
            distance: self.database.distance().to_u8(),
            top: self.database.distance().top() as u64,
            load_factor: self.database.load_factor(),
        }
    }

    pub fn encode_header_and_flags(&self) -> Result<Vec<u8>> {
        let mut flags_bytes = encode_file_flags(&self.file_flags())?;
        let header = FileHeader {
            magic: MAGIC, version: VERSION,
            n_profiles: self.database.profiles().len() as u64,
            flags_len: flags_bytes.len() as u64,
        };
        let mut out = encode_file_header(&header)?;
        out.append(&mut flags_bytes);
        Ok(out)
    }
}

impl Iterator for Encoder<'_> {
    type Item = Result<Vec<u8>>;

    fn next(
        &mut self,
    ) -> Option<Result<Vec<u8>>> {
        let (family, store) = self.profiles.next()?;
        Some(encode_profile(*family, store))
    }
}
