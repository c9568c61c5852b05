//! Thin wrappers over the Ed25519 group
//!
//! [`Ed25519Scalar`] and [`Ed25519Point`] carry the 32-byte canonical
//! encodings through the [`Serializable`] contract; arithmetic stays on the
//! underlying `curve25519-dalek` types.

use blake2::digest::{consts::U64, Digest};
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::Identity,
};

use crate::error::{Error, Result};
use crate::serializer::Serializable;

/// Byte width of a canonical scalar or compressed point
pub const ENCODED_SIZE: usize = 32;

/// Element of the Ed25519 scalar field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Scalar(pub Scalar);

impl Ed25519Scalar {
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }
}

impl Default for Ed25519Scalar {
    fn default() -> Self {
        Self(Scalar::ZERO)
    }
}

impl From<Scalar> for Ed25519Scalar {
    fn from(scalar: Scalar) -> Self {
        Self(scalar)
    }
}

impl Serializable for Ed25519Scalar {
    fn serialized_size(&self) -> usize {
        ENCODED_SIZE
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let raw: [u8; ENCODED_SIZE] = bytes.try_into().map_err(|_| Error::BadScalar)?;
        self.0 = Option::<Scalar>::from(Scalar::from_canonical_bytes(raw)).ok_or(Error::BadScalar)?;
        Ok(())
    }
}

/// Ed25519 group element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Point(pub EdwardsPoint);

impl Ed25519Point {
    pub fn as_point(&self) -> &EdwardsPoint {
        &self.0
    }
}

impl Default for Ed25519Point {
    fn default() -> Self {
        Self(EdwardsPoint::identity())
    }
}

impl From<EdwardsPoint> for Ed25519Point {
    fn from(point: EdwardsPoint) -> Self {
        Self(point)
    }
}

impl Serializable for Ed25519Point {
    fn serialized_size(&self) -> usize {
        ENCODED_SIZE
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.compress().as_bytes().to_vec()
    }

    fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let raw: [u8; ENCODED_SIZE] = bytes.try_into().map_err(|_| Error::BadPoint)?;
        self.0 = CompressedEdwardsY(raw).decompress().ok_or(Error::BadPoint)?;
        Ok(())
    }
}

/// Reduces a 64-byte digest to a canonical scalar.
pub fn scalar_from_hash<D: Digest<OutputSize = U64>>(hash: D) -> Ed25519Scalar {
    let mut wide = [0u8; 64];
    wide.copy_from_slice(hash.finalize().as_slice());
    Ed25519Scalar(Scalar::from_bytes_mod_order_wide(&wide))
}
