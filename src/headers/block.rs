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
use std::io::Read;

use bincode::{Encode, Decode};
use bincode::encode_into_std_write;
use bincode::decode_from_slice;

use crate::error::Result;

#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
pub struct BlockHeader {
    pub num_entries: u32,
    pub deflated_len: u32,
    pub block_len: u32,
    pub flags_len: u32,
    /// Distinct k-mers in the profile.
    pub size: u64,
    /// Buckets in the profile.
    pub capacity: u64,
}

/// Data about the profile in this block
///
/// Variable length, use [BlockHeader].flags_len to get size
///
#[derive(Clone, Debug, Encode, Decode, PartialEq)]
pub struct BlockFlags {
    /// Family name
    pub family: String,
    pub load_factor: f64,
}

/// A profile entry and the bucket holding it.
#[derive(Clone, Copy, Debug, Encode, Decode, PartialEq, Eq)]
pub struct StoredEntry {
    pub bucket: u64,
    pub key: u64,
    pub frequency: u64,
    pub seed: u32,
}

pub fn encode_block_header(
    header: &BlockHeader,
) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    let nbytes = encode_into_std_write(
        header,
        &mut bytes,
        bincode::config::standard().with_fixed_int_encoding(),
    )?;
    assert_eq!(nbytes, 32);
    Ok(bytes)
}

pub fn decode_block_header(
    header_bytes: &[u8],
) -> Result<BlockHeader> {
    Ok(decode_from_slice(header_bytes, bincode::config::standard().with_fixed_int_encoding())?.0)
}

pub fn read_block_header<R: Read>(
    conn: &mut R,
) -> Result<BlockHeader> {
    let mut header_bytes: [u8; 32] = [0_u8; 32];
    conn.read_exact(&mut header_bytes)?;
    decode_block_header(&header_bytes)
}

pub fn encode_block_flags(
    flags: &BlockFlags,
) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    let _ = encode_into_std_write(
        flags,
        &mut bytes,
        bincode::config::standard(),
    )?;
    Ok(bytes)
}

pub fn decode_block_flags(
    bytes: &[u8],
) -> Result<BlockFlags> {
    Ok(decode_from_slice(bytes, bincode::config::standard())?.0)
}

pub fn encode_entries(
    entries: &[StoredEntry],
) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    let _ = encode_into_std_write(
        entries,
        &mut bytes,
        bincode::config::standard(),
    )?;
    Ok(bytes)
}

pub fn decode_entries(
    bytes: &[u8],
) -> Result<Vec<StoredEntry>> {
    Ok(decode_from_slice(bytes, bincode::config::standard())?.0)
}
