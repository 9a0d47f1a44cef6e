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

//! Decoding a [ProfileDatabase] one profile at a time.

use std::io::Read;
use std::str::FromStr;

use crate::alphabet::Alphabet;
use crate::compression::inflate_bytes;
use crate::database::Family;
use crate::database::ProfileDatabase;
use crate::distance::Distance;
use crate::error::Error;
use crate::error::Result;
use crate::headers::block::decode_block_flags;
use crate::headers::block::decode_entries;
use crate::headers::block::read_block_header;
use crate::headers::file::FileFlags;
use crate::headers::file::FileHeader;
use crate::headers::file::read_file_flags;
use crate::headers::file::read_file_header;
use crate::kmer::seed::SeedSet;
use crate::store::MultiSeedStore;
use crate::store::StoreEntry;

/// Iterator over the profiles in encoded data.
pub struct Decoder<'a, R: Read> {
    // Inputs
    conn: &'a mut R,

    header: FileHeader,
    flags: FileFlags,

    // Rebuilt from the flags
    alphabet: Alphabet,
    seeds: SeedSet,
    distance: Distance,

    // Internals
    blocks_read: u64,
}

impl<'a, R: Read> Decoder<'a, R> {
    /// Read the file header and flags from `conn`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header is invalid or the alphabet and seeds
    /// in the flags do not reproduce the stored masks.
    ///
    pub fn new(
        conn: &'a mut R,
    ) -> Result<Self> {
        let header = read_file_header(conn)?;
        let flags = read_file_flags(&header, conn)?;

        let alphabet = Alphabet::from_groups(&flags.alphabet_id, &flags.alphabet_groups)?;
        let seeds = SeedSet::new(&flags.seed_patterns, &alphabet)?;
        if seeds.masks() != flags.masks.as_slice() {
            return Err(Error::CorruptBlock("seed masks do not match the alphabet".to_string()));
        }
        let distance = Distance::from_u8(flags.distance, flags.top as usize)
            .ok_or_else(|| Error::CorruptBlock(format!("unknown distance {}", flags.distance)))?;

        Ok(Decoder {
            conn, header, flags,
            alphabet, seeds, distance,
            blocks_read: 0,
        })
    }
}

impl<R: Read> Decoder<'_, R> {
    pub fn file_header(&self) -> &FileHeader {
        &self.header
    }

    pub fn file_flags(&self) -> &FileFlags {
        &self.flags
    }

    pub fn next_block(
        &mut self,
    ) -> Result<(Family, MultiSeedStore)> {
        let block_header = read_block_header(self.conn)?;
        let deflated_len = block_header.deflated_len as usize;
        let mut bytes: Vec<u8> = Vec::new();
        self.conn.by_ref().take(deflated_len as u64).read_to_end(&mut bytes)?;
        if bytes.len() < deflated_len {
            return Err(Error::CorruptBlock(format!("block truncated at {} of {} bytes", bytes.len(), deflated_len)));
        }
        let bytes = inflate_bytes(&bytes)?;

        let block_len = block_header.block_len as usize;
        if bytes.len() != block_len + block_header.flags_len as usize {
            return Err(Error::CorruptBlock(format!("inflated {} bytes, expected {}", bytes.len(), block_len + block_header.flags_len as usize)));
        }

        let entries = decode_entries(&bytes[0..block_len])?;
        let block_flags = decode_block_flags(&bytes[block_len..])?;
        if entries.len() != block_header.num_entries as usize {
            return Err(Error::CorruptBlock(format!("{} entries, expected {}", entries.len(), block_header.num_entries)));
        }

        let family = Family::from_str(&block_flags.family)?;
        let store = MultiSeedStore::from_parts(
            self.seeds.masks(),
            block_flags.load_factor,
            block_header.capacity as usize,
            entries.into_iter().map(|x| (x.bucket as usize, StoreEntry { key: x.key, frequency: x.frequency, seed: x.seed })),
            block_header.size as usize,
        )?;

        Ok((family, store))
    }

    /// Read the remaining profiles into a database.
    pub fn into_database(self) -> Result<ProfileDatabase> {
        let mut database = ProfileDatabase::with_alphabet(self.alphabet.clone(), self.seeds.clone(), self.distance, self.flags.load_factor)?;
        for block in self {
            let (family, store) = block?;
            database.add_profile(family, store)?;
        }
        Ok(database)
    }
}

impl<R: Read> Iterator for Decoder<'_, R> {
    type Item = Result<(Family, MultiSeedStore)>;

    fn next(
        &mut self,
    ) -> Option<Result<(Family, MultiSeedStore)>> {
        if self.blocks_read == self.header.n_profiles {
            return None;
        }
        self.blocks_read += 1;
        Some(self.next_block())
    }
}
