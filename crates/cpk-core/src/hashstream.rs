//! Unbounded pseudo-random byte stream
//!
//! Counter-mode keyed BLAKE2b-512: every refill hashes `secret ||
//! le64(counter)` under `secret` as the MAC key, yielding 64 fresh bytes.
//! The stream is fully determined by its 64-byte seed.

use blake2::digest::{consts::U64, Digest, KeyInit, Mac};
use blake2::Blake2bMac512;

/// Seed and refill-buffer width in bytes
pub const SEED_SIZE: usize = 64;

/// Deterministic byte stream seeded by a 64-byte digest
pub struct HashStream {
    secret: [u8; SEED_SIZE],
    counter: i64,
    ptr: usize,
    curr: [u8; SEED_SIZE],
}

impl HashStream {
    pub fn new(seed: [u8; SEED_SIZE]) -> Self {
        Self {
            secret: seed,
            counter: 0,
            ptr: SEED_SIZE,
            curr: [0u8; SEED_SIZE],
        }
    }

    /// Seeds a stream from the sum of a 64-byte-output digest.
    pub fn from_digest<D: Digest<OutputSize = U64>>(hash: D) -> Self {
        let mut seed = [0u8; SEED_SIZE];
        seed.copy_from_slice(hash.finalize().as_slice());
        Self::new(seed)
    }

    pub fn next_byte(&mut self) -> u8 {
        if self.ptr == SEED_SIZE {
            let mut mac =
                <Blake2bMac512 as KeyInit>::new_from_slice(&self.secret).expect("64-byte blake2b key");
            mac.update(&self.secret);
            mac.update(&self.counter.to_le_bytes());
            self.curr.copy_from_slice(mac.finalize().into_bytes().as_slice());
            self.counter += 1;
            self.ptr = 0;
        }
        let byte = self.curr[self.ptr];
        self.ptr += 1;
        byte
    }
}
