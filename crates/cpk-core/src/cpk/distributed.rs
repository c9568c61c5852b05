//! Distributed certificate authority holding one matrix shard
//!
//! Shards 0 and 1 derive the first half of the matrix (counters
//! `0..MATRIX_PIECE_SIZE`), shards 2 and 3 the second half. A shard pair of
//! opposite halves covers the whole matrix, so shards `{0,2}` or `{1,3}`
//! together stand in for a centralized authority without either node
//! knowing the other half.

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use tracing::debug;

use super::ca::{matrix_cell, read_scalar_matrix};
use super::{select_cells, CELLS_PER_IDENT, MATRIX_PIECE_SIZE, PIECES_COUNT};
use super::{PmPiece, SkPiece};
use crate::curve::{Ed25519Point, Ed25519Scalar};
use crate::error::Result;
use crate::serializer::{Deserializer, Serializer};

/// Authority holding one of the four private-matrix shards
pub struct DistributedCa {
    index: i64,
    private_matrix_piece: Vec<Ed25519Scalar>,
}

impl DistributedCa {
    /// Derives shard `index` from a generation seed. Shards with
    /// `index >= 2` start their cell counters at `MATRIX_PIECE_SIZE`.
    pub fn new(index: i64, gen_key: &str) -> Self {
        assert!(
            (0..PIECES_COUNT as i64).contains(&index),
            "shard index out of range"
        );
        let start = if index >= 2 { MATRIX_PIECE_SIZE as i64 } else { 0 };
        let private_matrix_piece = (start..start + MATRIX_PIECE_SIZE as i64)
            .map(|counter| matrix_cell(gen_key, counter))
            .collect();
        debug!(index, cells = MATRIX_PIECE_SIZE, "generated matrix shard");
        Self {
            index,
            private_matrix_piece,
        }
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    /// This shard's contribution to an identity's private key: the sum of
    /// the selected cells falling inside the shard's matrix half.
    pub fn query_sk(&self, ident: &str) -> SkPiece {
        let cells = select_cells(ident);
        let (half, offset) = if self.index >= 2 {
            (&cells[CELLS_PER_IDENT / 2..], MATRIX_PIECE_SIZE)
        } else {
            (&cells[..CELLS_PER_IDENT / 2], 0)
        };

        let mut sum = Scalar::ZERO;
        for &cell in half {
            sum += self.private_matrix_piece[cell - offset].0;
        }
        SkPiece {
            index: self.index,
            secret: Ed25519Scalar(sum),
        }
    }

    /// This shard's slice of the public matrix.
    pub fn export_public_matrix_piece(&self) -> PmPiece {
        PmPiece {
            index: self.index,
            piece: self
                .private_matrix_piece
                .iter()
                .map(|cell| Ed25519Point(EdwardsPoint::mul_base(&cell.0)))
                .collect(),
        }
    }

    pub fn serialize(&self, serializer: &mut Serializer) {
        serializer.write_i64(self.private_matrix_piece.len() as i64);
        for cell in &self.private_matrix_piece {
            serializer.write_serializable(cell);
        }
        serializer.write_i64(self.index);
    }

    pub fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        let private_matrix_piece = read_scalar_matrix(deserializer)?;
        let index = deserializer.read_i64()?;
        Ok(Self {
            index,
            private_matrix_piece,
        })
    }
}
