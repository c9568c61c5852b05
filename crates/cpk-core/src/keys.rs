//! Keypairs, Schnorr-style signatures and Diffie-Hellman key exchange
//!
//! Signing derives its nonce from a 32-byte `sign_key` (BLAKE2b of the
//! scalar encoding), so signatures are deterministic per message. Key
//! exchange hashes the shared point into a 64-byte session key and rejects
//! the identity point on either side.

use blake2::digest::Digest;
use blake2::Blake2b512;
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::IsIdentity,
};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curve::{scalar_from_hash, ENCODED_SIZE};
use crate::error::{Error, Result};

/// Byte width of a serialized signature (`s || c`)
pub const SIGNATURE_SIZE: usize = 2 * ENCODED_SIZE;

/// Byte width of a derived key-exchange key
pub const KX_KEY_SIZE: usize = 64;

/// Ed25519 public key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) point: EdwardsPoint,
}

/// Ed25519 private key with its derived signing key and cached public key
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    scalar: Scalar,
    sign_key: [u8; 32],
    #[zeroize(skip)]
    public: PublicKey,
}

/// Schnorr-style signature, serialized as `s(32) || c(32)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    s: Scalar,
    c: Scalar,
}

impl PublicKey {
    pub fn from_point(point: EdwardsPoint) -> Self {
        Self { point }
    }

    pub fn as_point(&self) -> &EdwardsPoint {
        &self.point
    }

    pub fn to_bytes(&self) -> [u8; ENCODED_SIZE] {
        self.point.compress().to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ENCODED_SIZE] = bytes.try_into().map_err(|_| Error::BadPoint)?;
        let point = CompressedEdwardsY(raw).decompress().ok_or(Error::BadPoint)?;
        Ok(Self { point })
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let big_r = EdwardsPoint::vartime_double_scalar_mul_basepoint(
            &signature.c,
            &-self.point,
            &signature.s,
        );
        challenge(&big_r, self, message) == signature.c
    }

    /// Initiator side of the key exchange: returns the wire bytes to send
    /// and the derived session key.
    pub fn kx_send(&self) -> Result<([u8; ENCODED_SIZE], [u8; KX_KEY_SIZE])> {
        if self.point.is_identity() {
            return Err(Error::KxBadPublicKey);
        }
        let ephemeral = PrivateKey::random();
        let wire = EdwardsPoint::mul_base(&ephemeral.scalar).compress().to_bytes();
        let shared = ephemeral.scalar * self.point;
        Ok((wire, kx_key(&shared)))
    }
}

impl PrivateKey {
    pub fn from_scalar(scalar: Scalar) -> Self {
        let digest = Blake2b512::digest(scalar.as_bytes());
        let mut sign_key = [0u8; 32];
        sign_key.copy_from_slice(&digest[..32]);
        let public = PublicKey {
            point: EdwardsPoint::mul_base(&scalar),
        };
        Self {
            scalar,
            sign_key,
            public,
        }
    }

    /// Fresh key from 64 bytes of system randomness.
    pub fn random() -> Self {
        let mut wide = [0u8; 64];
        OsRng.fill_bytes(&mut wide);
        Self::from_scalar(Scalar::from_bytes_mod_order_wide(&wide))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ENCODED_SIZE] = bytes.try_into().map_err(|_| Error::BadScalar)?;
        let scalar =
            Option::<Scalar>::from(Scalar::from_canonical_bytes(raw)).ok_or(Error::BadScalar)?;
        Ok(Self::from_scalar(scalar))
    }

    pub fn to_bytes(&self) -> [u8; ENCODED_SIZE] {
        self.scalar.to_bytes()
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    pub fn public(&self) -> PublicKey {
        self.public
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let mut hash = Blake2b512::new();
        hash.update(self.sign_key);
        hash.update(message);
        let r = scalar_from_hash(hash).0;
        let big_r = EdwardsPoint::mul_base(&r);

        let c = challenge(&big_r, &self.public, message);
        Signature {
            s: c * self.scalar + r,
            c,
        }
    }

    /// Responder side of the key exchange: derives the session key from the
    /// peer's wire bytes.
    pub fn kx_receive(&self, wire: &[u8]) -> Result<[u8; KX_KEY_SIZE]> {
        let raw: [u8; ENCODED_SIZE] = wire.try_into().map_err(|_| Error::BadPoint)?;
        let point = CompressedEdwardsY(raw).decompress().ok_or(Error::BadPoint)?;
        if point.is_identity() {
            return Err(Error::KxBadPublicKey);
        }
        Ok(kx_key(&(self.scalar * point)))
    }
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..ENCODED_SIZE].copy_from_slice(self.s.as_bytes());
        out[ENCODED_SIZE..].copy_from_slice(self.c.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::BadSignature);
        }
        let s = decode_scalar(&bytes[..ENCODED_SIZE])?;
        let c = decode_scalar(&bytes[ENCODED_SIZE..])?;
        Ok(Self { s, c })
    }
}

fn decode_scalar(bytes: &[u8]) -> Result<Scalar> {
    let raw: [u8; ENCODED_SIZE] = bytes.try_into().map_err(|_| Error::BadSignature)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(raw)).ok_or(Error::BadSignature)
}

fn challenge(big_r: &EdwardsPoint, public: &PublicKey, message: &[u8]) -> Scalar {
    let mut hash = Blake2b512::new();
    hash.update(big_r.compress().as_bytes());
    hash.update(public.point.compress().as_bytes());
    hash.update(message);
    scalar_from_hash(hash).0
}

fn kx_key(shared: &EdwardsPoint) -> [u8; KX_KEY_SIZE] {
    let mut out = [0u8; KX_KEY_SIZE];
    out.copy_from_slice(Blake2b512::digest(shared.compress().as_bytes()).as_slice());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::traits::Identity;

    #[test]
    fn sign_and_verify() {
        let private = PrivateKey::random();
        let public = private.public();

        let signature = private.sign(b"123456");
        assert!(public.verify(b"123456", &signature));
    }

    #[test]
    fn tampering_breaks_verification() {
        let private = PrivateKey::random();
        let public = private.public();
        let signature = private.sign(b"123456");

        assert!(!public.verify(b"123457", &signature));

        let mut raw = signature.to_bytes();
        raw[0] ^= 1;
        if let Ok(mangled) = Signature::from_bytes(&raw) {
            assert!(!public.verify(b"123456", &mangled));
        }
    }

    #[test]
    fn signature_bytes_roundtrip() {
        let private = PrivateKey::random();
        let signature = private.sign(b"payload");
        let decoded = Signature::from_bytes(&signature.to_bytes()).unwrap();
        assert_eq!(signature, decoded);

        assert!(matches!(
            Signature::from_bytes(&[0u8; 63]),
            Err(Error::BadSignature)
        ));
    }

    #[test]
    fn kx_roundtrip() {
        let private = PrivateKey::random();
        let public = private.public();

        let (wire, key) = public.kx_send().unwrap();
        let key2 = private.kx_receive(&wire).unwrap();
        assert_eq!(key, key2);
    }

    #[test]
    fn kx_fixture() {
        let raw =
            hex::decode("5399cfa5eab9bd2e54f1e57731b13a2c89aee7acc552f50377c9e291fcb5870d")
                .unwrap();
        let private = PrivateKey::from_bytes(&raw).unwrap();

        let wire =
            hex::decode("e618254b8cc4fe9abf995c8423e4657ad587a80932330faae4ac226ac97cb9d5")
                .unwrap();
        let key = private.kx_receive(&wire).unwrap();
        assert_eq!(
            hex::encode(key),
            "f0500705de23d877bc6b332514659a6d94e3e7835eaca4b471eea6541223b536cd42abcab96d409ef3a6bfb203e9051f2354457d81a781440c77688200ec60f8"
        );
    }

    #[test]
    fn kx_rejects_identity_peer() {
        let identity = PublicKey::from_point(EdwardsPoint::identity());
        assert!(matches!(identity.kx_send(), Err(Error::KxBadPublicKey)));

        let private = PrivateKey::random();
        let wire = EdwardsPoint::identity().compress().to_bytes();
        assert!(matches!(
            private.kx_receive(&wire),
            Err(Error::KxBadPublicKey)
        ));
    }
}
