//! Typed BLAKE2b-512 hashing utility
//!
//! Appends typed values to a running digest: strings as UTF-8 bytes,
//! integers as fixed-width little-endian, booleans as a single `0`/`1`
//! byte, byte slices verbatim. One [`HashInput`] implementation exists per
//! supported type; anything else is a compile error.

use blake2::digest::{Digest, KeyInit, Mac};
use blake2::{Blake2b512, Blake2bMac512};

#[derive(Clone)]
enum State {
    Plain(Blake2b512),
    Keyed(Blake2bMac512),
}

/// Incremental BLAKE2b-512 over typed inputs, optionally keyed
#[derive(Clone)]
pub struct Hasher {
    key: Option<Vec<u8>>,
    state: State,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            key: None,
            state: State::Plain(Blake2b512::new()),
        }
    }

    /// Keyed variant; the key must be at most 64 bytes.
    pub fn with_key(key: &[u8]) -> Self {
        Self {
            key: Some(key.to_vec()),
            state: State::Keyed(keyed_state(key)),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            State::Plain(hash) => Digest::update(hash, data),
            State::Keyed(mac) => Mac::update(mac, data),
        }
    }

    pub fn push(&mut self, value: impl HashInput) -> &mut Self {
        value.feed(self);
        self
    }

    /// Digest of everything pushed so far; the state stays usable.
    pub fn sum(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        match self.state.clone() {
            State::Plain(hash) => out.copy_from_slice(hash.finalize().as_slice()),
            State::Keyed(mac) => out.copy_from_slice(mac.finalize().into_bytes().as_slice()),
        }
        out
    }

    pub fn sum_hex(&self) -> String {
        hex::encode(self.sum())
    }

    pub fn reset(&mut self) {
        self.state = match &self.key {
            None => State::Plain(Blake2b512::new()),
            Some(key) => State::Keyed(keyed_state(key)),
        };
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

fn keyed_state(key: &[u8]) -> Blake2bMac512 {
    <Blake2bMac512 as KeyInit>::new_from_slice(key).expect("blake2b key of at most 64 bytes")
}

/// A value the [`Hasher`] knows how to append
pub trait HashInput {
    fn feed(self, hasher: &mut Hasher);
}

impl HashInput for &str {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(self.as_bytes());
    }
}

impl HashInput for &String {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(self.as_bytes());
    }
}

impl HashInput for i32 {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(&self.to_le_bytes());
    }
}

impl HashInput for u32 {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(&self.to_le_bytes());
    }
}

impl HashInput for i64 {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(&self.to_le_bytes());
    }
}

impl HashInput for u64 {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(&self.to_le_bytes());
    }
}

impl HashInput for bool {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(&[u8::from(self)]);
    }
}

impl HashInput for &[u8] {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(self);
    }
}

impl HashInput for &Vec<u8> {
    fn feed(self, hasher: &mut Hasher) {
        hasher.update(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_reproduces_digest() {
        let mut hasher = Hasher::new();
        let first = hasher.push(32i32).push(true).sum();
        assert_eq!(first.len(), 64);

        hasher.reset();
        let second = hasher.push(32i32).push(true).sum();
        assert_eq!(first, second);

        hasher.reset();
        let third = hasher.push(32i32).push("").push(true).sum();
        assert_eq!(first, third);
    }

    #[test]
    fn typed_pushes_match_raw_bytes() {
        let mut typed = Hasher::new();
        typed.push(7i64).push("ab").push(false);

        let mut raw = Hasher::new();
        raw.push(&7i64.to_le_bytes()[..]).push(&b"ab"[..]).push(&[0u8][..]);

        assert_eq!(typed.sum(), raw.sum());
    }

    #[test]
    fn keyed_differs_from_plain() {
        let mut plain = Hasher::new();
        let mut keyed = Hasher::with_key(b"key");
        plain.push("data");
        keyed.push("data");
        assert_ne!(plain.sum(), keyed.sum());

        keyed.reset();
        keyed.push("data");
        assert_eq!(keyed.sum_hex(), hex::encode(keyed.sum()));
    }
}
