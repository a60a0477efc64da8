//! Buzhash-style lightweight digest provider
//!
//! Produces an 8-byte digest per block. It is fast but not collision
//! resistant: only use it when both sides trust the data and a rare false
//! block match is acceptable. Signatures built with it are not comparable
//! with BLAKE3 signatures.

use crate::digest::{Digest, DigestProvider};
use std::io;

/// A 64-bit Buzhash accumulator implementing [`DigestProvider`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuzHashDigest {
    /// Current hash value
    hash: u64,
    /// Bytes fed since the last reset
    len: u64,
}

impl BuzHashDigest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hash value without the length mix-in
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    fn update(&mut self, byte: u8) {
        self.hash = self.hash.rotate_left(1) ^ Self::map_byte(byte);
        self.len += 1;
    }

    /// Compute the hash contribution of a byte (pseudo-random mapping)
    fn map_byte(byte: u8) -> u64 {
        // SplitMix64 finalizer constants
        let mut x = u64::from(byte) ^ 0x9E37_79B9_7F4A_7C15;
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }

    /// Compute the hash of a byte slice in one call
    #[must_use]
    pub fn hash_slice(data: &[u8]) -> u64 {
        let mut state = Self::new();
        data.iter().for_each(|&byte| state.update(byte));
        state.hash
    }
}

impl DigestProvider for BuzHashDigest {
    fn feed(&mut self, bytes: &[u8]) -> io::Result<()> {
        bytes.iter().for_each(|&byte| self.update(byte));
        Ok(())
    }

    fn digest(&self) -> Digest {
        // Mix in the block length.
        Digest::from((self.hash ^ self.len.wrapping_mul(0x9E37_79B9_7F4A_7C15)).to_be_bytes())
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
