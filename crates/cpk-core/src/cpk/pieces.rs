//! Shard contributions exchanged between authorities and clients

use crate::curve::{Ed25519Point, Ed25519Scalar, ENCODED_SIZE};
use crate::error::{Error, Result};
use crate::serializer::{Deserializer, Serializer};

/// One authority's private-key contribution for an identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkPiece {
    /// Shard index of the issuing authority
    pub index: i64,
    /// Sum of the shard's selected scalars
    pub secret: Ed25519Scalar,
}

impl SkPiece {
    pub fn serialize(&self, serializer: &mut Serializer) {
        serializer.write_i64(self.index);
        serializer.write_serializable(&self.secret);
    }

    pub fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        let index = deserializer.read_i64()?;
        let mut secret = Ed25519Scalar::default();
        deserializer.read_serializable(&mut secret)?;
        Ok(Self { index, secret })
    }
}

/// One authority's slice of the public matrix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PmPiece {
    /// Shard index of the issuing authority
    pub index: i64,
    /// The shard's points, in cell order
    pub piece: Vec<Ed25519Point>,
}

impl PmPiece {
    pub fn serialize(&self, serializer: &mut Serializer) {
        serializer.write_i64(self.index);
        serializer.write_i64(self.piece.len() as i64);
        for point in &self.piece {
            serializer.write_serializable(point);
        }
    }

    pub fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        let index = deserializer.read_i64()?;
        let count = deserializer.read_i64()?;
        if count < 0 || count as u64 > (deserializer.remaining() / ENCODED_SIZE) as u64 {
            return Err(Error::BadLengthPrefix(count));
        }
        let mut piece = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut point = Ed25519Point::default();
            deserializer.read_serializable(&mut point)?;
            piece.push(point);
        }
        Ok(Self { index, piece })
    }
}
