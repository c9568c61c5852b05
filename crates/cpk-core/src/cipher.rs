//! Authenticated encryption with XSalsa20-Poly1305
//!
//! Sealed boxes are `nonce(24) || ciphertext_with_tag`; the nonce is drawn
//! fresh from the system RNG for every seal.

use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Key, Nonce, XSalsa20Poly1305};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Secretbox key width
pub const KEY_SIZE: usize = 32;

/// Secretbox nonce width
pub const NONCE_SIZE: usize = 24;

/// Symmetric key for sealing and opening boxes
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Cipher([u8; KEY_SIZE]);

impl Cipher {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    pub fn seal(&self, message: &[u8]) -> Vec<u8> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let boxed = XSalsa20Poly1305::new(Key::from_slice(&self.0))
            .encrypt(Nonce::from_slice(&nonce), message)
            .expect("secretbox seal");

        let mut out = Vec::with_capacity(NONCE_SIZE + boxed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&boxed);
        out
    }

    pub fn open(&self, secret: &[u8]) -> Result<Vec<u8>> {
        if secret.len() < NONCE_SIZE {
            return Err(Error::CipherTooSmall);
        }
        let (nonce, boxed) = secret.split_at(NONCE_SIZE);
        XSalsa20Poly1305::new(Key::from_slice(&self.0))
            .decrypt(Nonce::from_slice(nonce), boxed)
            .map_err(|_| Error::CipherVerification)
    }
}

impl From<[u8; KEY_SIZE]> for Cipher {
    fn from(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }
}
