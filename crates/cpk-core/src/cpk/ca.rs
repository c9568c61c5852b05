//! Centralized certificate authority holding the full private matrix

use blake2::digest::{KeyInit, Mac};
use blake2::Blake2bMac512;
use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use tracing::debug;

use super::{select_cells, MATRIX_SIZE};
use crate::curve::{Ed25519Point, Ed25519Scalar, ENCODED_SIZE};
use crate::error::{Error, Result};
use crate::keys::PrivateKey;
use crate::serializer::{Deserializer, Serializer};

/// Authority that can answer any identity's private key by itself
pub struct CentralizedCa {
    private_matrix: Vec<Ed25519Scalar>,
}

impl CentralizedCa {
    /// Derives the full matrix from a generation seed.
    pub fn new(gen_key: &str) -> Self {
        let private_matrix = (0..MATRIX_SIZE as i64)
            .map(|counter| matrix_cell(gen_key, counter))
            .collect();
        debug!(cells = MATRIX_SIZE, "generated private matrix");
        Self { private_matrix }
    }

    /// Private key for an identity: the sum of its selected cells.
    pub fn query_sk(&self, ident: &str) -> PrivateKey {
        let mut sum = Scalar::ZERO;
        for cell in select_cells(ident) {
            sum += self.private_matrix[cell].0;
        }
        PrivateKey::from_scalar(sum)
    }

    /// Point matrix a client needs to answer public-key queries.
    pub fn export_public_matrix(&self) -> Vec<Ed25519Point> {
        self.private_matrix
            .iter()
            .map(|cell| Ed25519Point(EdwardsPoint::mul_base(&cell.0)))
            .collect()
    }

    pub fn serialize(&self, serializer: &mut Serializer) {
        serializer.write_i64(self.private_matrix.len() as i64);
        for cell in &self.private_matrix {
            serializer.write_serializable(cell);
        }
    }

    pub fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        Ok(Self {
            private_matrix: read_scalar_matrix(deserializer)?,
        })
    }
}

/// Matrix cell for `counter` under `gen_key`: keyed BLAKE2b of the
/// little-endian counter, reduced to a scalar.
pub(super) fn matrix_cell(gen_key: &str, counter: i64) -> Ed25519Scalar {
    let mut mac = <Blake2bMac512 as KeyInit>::new_from_slice(gen_key.as_bytes())
        .expect("matrix seed of at most 64 bytes");
    mac.update(&counter.to_le_bytes());
    let mut wide = [0u8; 64];
    wide.copy_from_slice(mac.finalize().into_bytes().as_slice());
    Ed25519Scalar(Scalar::from_bytes_mod_order_wide(&wide))
}

pub(super) fn read_scalar_matrix(
    deserializer: &mut Deserializer<'_>,
) -> Result<Vec<Ed25519Scalar>> {
    let count = deserializer.read_i64()?;
    if count < 0 || count as u64 > (deserializer.remaining() / ENCODED_SIZE) as u64 {
        return Err(Error::BadLengthPrefix(count));
    }
    let mut matrix = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut cell = Ed25519Scalar::default();
        deserializer.read_serializable(&mut cell)?;
        matrix.push(cell);
    }
    Ok(matrix)
}
