//! Salted password records
//!
//! A record is `hex(salt_32) ":" hex(HMAC-SHA256(key=salt, password))`.
//! Verification recomputes the MAC under the recorded salt and compares in
//! constant time.

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const SALT_SIZE: usize = 32;

/// Builds a record for a freshly salted password.
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    format!(
        "{}:{}",
        hex::encode(salt),
        hex::encode(mac_bytes(&salt, password))
    )
}

/// Checks a password against a record produced by [`hash`].
pub fn verify(record: &str, password: &str) -> Result<()> {
    let trimmed = record.trim();
    let (salt_hex, mac_hex) = trimmed.split_once(':').ok_or(Error::PasswordRecord)?;
    if mac_hex.contains(':') {
        return Err(Error::PasswordRecord);
    }
    let salt = hex::decode(salt_hex).map_err(|_| Error::PasswordRecord)?;
    let expected = hex::decode(mac_hex).map_err(|_| Error::PasswordRecord)?;

    let actual = mac_bytes(&salt, password);
    if bool::from(actual.as_slice().ct_eq(expected.as_slice())) {
        Ok(())
    } else {
        Err(Error::PasswordMismatch)
    }
}

fn mac_bytes(salt: &[u8], password: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(salt).expect("hmac accepts any key length");
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
