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

//! Gzip compression of profile blocks.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::Result;

pub fn deflate_bytes(
    bytes: &[u8],
) -> Result<Vec<u8>> {
    let mut deflated: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut encoder = GzEncoder::new(&mut deflated, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(deflated)
}

pub fn inflate_bytes(
    deflated: &[u8],
) -> Result<Vec<u8>> {
    let mut inflated: Vec<u8> = Vec::new();
    let mut decoder = GzDecoder::new(&mut inflated);
    decoder.write_all(deflated)?;
    decoder.finish()?;
    Ok(inflated)
}

#[cfg(test)]
mod tests {
    #[test]
    fn inflate_deflated() {
        use super::deflate_bytes;
        use super::inflate_bytes;

        let data: Vec<u8> = (0..4096_u32).map(|x| (x % 7) as u8).collect();
        let deflated = deflate_bytes(&data).unwrap();

        assert!(deflated.len() < data.len());
        assert_eq!(inflate_bytes(&deflated).unwrap(), data);
    }
}
