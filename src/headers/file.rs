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

use crate::error::Error;
use crate::error::Result;

/// `AMPSEED\0` read as a little endian integer.
pub const MAGIC: u64 = u64::from_le_bytes(*b"AMPSEED\0");
pub const VERSION: u64 = 1;

#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u64,
    pub version: u64,
    pub n_profiles: u64,
    pub flags_len: u64,
}

/// Configuration shared by all profiles.
///
/// Variable length, use [FileHeader].flags_len to get size.
///
#[derive(Clone, Debug, Encode, Decode, PartialEq)]
pub struct FileFlags {
    pub alphabet_id: String,
    /// Residue classes ordered by code.
    pub alphabet_groups: Vec<String>,
    pub seed_patterns: Vec<String>,
    pub masks: Vec<u64>,
    pub distance: u8,
    pub top: u64,
    pub load_factor: f64,
}

pub fn encode_file_header(
    header: &FileHeader,
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

pub fn decode_file_header(
    header_bytes: &[u8],
) -> Result<FileHeader> {
    Ok(decode_from_slice(header_bytes, bincode::config::standard().with_fixed_int_encoding())?.0)
}

/// Read and check the 32 byte [FileHeader].
///
/// ## Errors
///
/// Returns [Error::BadMagic] if the data is not an ampseed database and
/// [Error::UnsupportedVersion] if it was written by an incompatible version.
///
pub fn read_file_header<R: Read>(
    conn: &mut R,
) -> Result<FileHeader> {
    let mut header_bytes: [u8; 32] = [0_u8; 32];
    conn.read_exact(&mut header_bytes)?;
    let header = decode_file_header(&header_bytes)?;
    if header.magic != MAGIC {
        return Err(Error::BadMagic(header.magic));
    }
    if header.version != VERSION {
        return Err(Error::UnsupportedVersion(header.version));
    }
    Ok(header)
}

pub fn encode_file_flags(
    flags: &FileFlags,
) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    let _ = encode_into_std_write(
        flags,
        &mut bytes,
        bincode::config::standard(),
    )?;
    Ok(bytes)
}

pub fn decode_file_flags(
    bytes: &[u8],
) -> Result<FileFlags> {
    Ok(decode_from_slice(bytes, bincode::config::standard())?.0)
}

pub fn read_file_flags<R: Read>(
    header: &FileHeader,
    conn: &mut R,
) -> Result<FileFlags> {
    let mut flags_bytes: Vec<u8> = Vec::new();
    conn.by_ref().take(header.flags_len).read_to_end(&mut flags_bytes)?;
    if (flags_bytes.len() as u64) < header.flags_len {
        return Err(Error::CorruptBlock(format!("file flags truncated at {} of {} bytes", flags_bytes.len(), header.flags_len)));
    }
    decode_file_flags(&flags_bytes)
}
