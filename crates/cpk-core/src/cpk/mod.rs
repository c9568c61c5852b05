//! Combined Public Key matrix scheme
//!
//! An identity string seeds a deterministic walk over a 32x32 matrix: for
//! each of the four 8-row blocks, two stream bytes pick the starting row of
//! a fixed Latin-square pattern and one byte per row picks the column. The
//! 32 selected cells sum to the identity's key - scalars on the authority
//! side, points on the client side.

mod ca;
mod client;
mod distributed;
mod pieces;

pub use ca::CentralizedCa;
pub use client::{CachedClient, Client};
pub use distributed::DistributedCa;
pub use pieces::{PmPiece, SkPiece};

use blake2::digest::Digest;
use blake2::Blake2b512;

use crate::hashstream::HashStream;

/// Rows (and columns) of the key matrix
pub const MATRIX_ROWS: usize = 32;

/// Total number of matrix cells
pub const MATRIX_SIZE: usize = MATRIX_ROWS * MATRIX_ROWS;

/// Rows per substitution block
pub const SUBS_SIZE: usize = 8;

/// Number of shards the private matrix splits into
pub const PIECES_COUNT: usize = 4;

/// Cells held by one shard; two shards of opposite halves cover the matrix
pub const MATRIX_PIECE_SIZE: usize = MATRIX_SIZE / PIECES_COUNT * 2;

/// Cells selected per identity
pub const CELLS_PER_IDENT: usize = (MATRIX_ROWS / SUBS_SIZE) * SUBS_SIZE;

const SUBS_TABLE: [[usize; SUBS_SIZE]; SUBS_SIZE] = [
    [0, 1, 2, 3, 4, 5, 6, 7],
    [1, 2, 3, 4, 5, 6, 7, 0],
    [2, 3, 4, 5, 6, 7, 0, 1],
    [3, 4, 5, 6, 7, 0, 1, 2],
    [4, 5, 6, 7, 0, 1, 2, 3],
    [5, 6, 7, 0, 1, 2, 3, 4],
    [6, 7, 0, 1, 2, 3, 4, 5],
    [7, 0, 1, 2, 3, 4, 5, 6],
];

/// Matrix indices selected by an identity, in block order.
///
/// The first half of the sequence lies in the first half of the matrix and
/// vice versa, so a shard sums the half of the sequence matching its cells
/// and the stream bytes consumed per block stay aligned across shards.
pub(crate) fn select_cells(ident: &str) -> [usize; CELLS_PER_IDENT] {
    let mut hash = Blake2b512::new();
    hash.update(ident.as_bytes());
    let mut stream = HashStream::from_digest(hash);

    let mut cells = [0usize; CELLS_PER_IDENT];
    let mut filled = 0;
    for block in 0..MATRIX_ROWS / SUBS_SIZE {
        let pi = (stream.next_byte() & 7) as usize;
        let pj = (stream.next_byte() & 7) as usize;
        for row in 0..SUBS_SIZE {
            let y = SUBS_TABLE[(pi + row) % SUBS_SIZE][pj] + SUBS_SIZE * block;
            let x = (stream.next_byte() as usize & (MATRIX_ROWS - 1)) % MATRIX_ROWS;
            cells[filled] = MATRIX_ROWS * y + x;
            filled += 1;
        }
    }
    cells
}
