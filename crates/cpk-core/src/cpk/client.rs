//! Client side of the scheme: public-key queries and piece combination

use std::collections::BTreeMap;

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar, traits::Identity};
use tracing::{debug, warn};

use super::{select_cells, MATRIX_SIZE, PIECES_COUNT};
use super::{PmPiece, SkPiece};
use crate::cache::LruCache;
use crate::curve::Ed25519Point;
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey};

/// Holder of the public matrix
pub struct Client {
    public_matrix: Vec<Ed25519Point>,
}

impl Client {
    /// Wraps a full point matrix, e.g. one exported by a centralized
    /// authority.
    pub fn new(public_matrix: Vec<Ed25519Point>) -> Self {
        assert_eq!(
            public_matrix.len(),
            MATRIX_SIZE,
            "public matrix must cover every cell"
        );
        Self { public_matrix }
    }

    /// Rebuilds the matrix from shard pieces.
    ///
    /// Requires, after deduplication by shard index, two even-index and two
    /// odd-index pieces each covering the matrix. The even pieces install
    /// the matrix; the odd pieces must reproduce it cell for cell.
    pub fn from_pm_pieces(pieces: &[PmPiece]) -> Result<Self> {
        let mut by_index: BTreeMap<i64, &PmPiece> = BTreeMap::new();
        for piece in pieces {
            by_index.entry(piece.index).or_insert(piece);
        }

        let group = |parity: i64| -> Result<Vec<Ed25519Point>> {
            let members: Vec<&&PmPiece> = by_index
                .values()
                .filter(|piece| piece.index & 1 == parity)
                .collect();
            if members.len() != PIECES_COUNT / 2 {
                return Err(Error::WrongPieceSet);
            }
            let matrix: Vec<Ed25519Point> = members
                .iter()
                .flat_map(|piece| piece.piece.iter().copied())
                .collect();
            if matrix.len() != MATRIX_SIZE {
                return Err(Error::WrongPieceSet);
            }
            Ok(matrix)
        };

        let even = group(0)?;
        let odd = group(1)?;
        for (cell, (a, b)) in even.iter().zip(&odd).enumerate() {
            if a != b {
                warn!(cell, "parity groups disagree");
                return Err(Error::PieceDisagreement(cell));
            }
        }

        debug!(pieces = by_index.len(), "combined public matrix from shards");
        Ok(Self::new(even))
    }

    /// Public key for an identity: the sum of its selected matrix cells.
    pub fn query_pk(&self, ident: &str) -> PublicKey {
        let mut sum = EdwardsPoint::identity();
        for cell in select_cells(ident) {
            sum += self.public_matrix[cell].0;
        }
        PublicKey::from_point(sum)
    }

    /// Combines shard private-key pieces into the full private key.
    ///
    /// Pieces are bucketed by shard parity; the first bucket whose sum is
    /// the discrete log of `my_public_key` wins. Either parity pair covers
    /// the matrix, so any three of the four shards still succeed.
    pub fn combine_sk_pieces(
        &self,
        pieces: &[SkPiece],
        my_public_key: &PublicKey,
    ) -> Option<PrivateKey> {
        let mut candidates = [Scalar::ZERO; 2];
        for piece in pieces {
            candidates[(piece.index & 1) as usize] += piece.secret.0;
        }

        candidates
            .into_iter()
            .find(|candidate| EdwardsPoint::mul_base(candidate) == *my_public_key.as_point())
            .map(PrivateKey::from_scalar)
    }

    /// Wraps this client in an LRU-backed public-key cache.
    pub fn into_cached(self, capacity: usize) -> CachedClient {
        CachedClient {
            client: self,
            cache: LruCache::new(capacity),
        }
    }
}

/// [`Client`] with memoized public-key lookups
pub struct CachedClient {
    client: Client,
    cache: LruCache<PublicKey>,
}

impl CachedClient {
    pub fn query_pk(&mut self, ident: &str) -> PublicKey {
        let client = &self.client;
        *self.cache.get_or_load(ident, |key| client.query_pk(key))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::super::DistributedCa;
    use super::*;
    use crate::serializer::{Deserializer, Serializer};

    fn shard_set() -> Vec<DistributedCa> {
        (0..PIECES_COUNT as i64)
            .map(|index| {
                let gen_key = if index >= 2 { "gen_key2" } else { "gen_key1" };
                DistributedCa::new(index, gen_key)
            })
            .collect()
    }

    fn client_for(shards: &[DistributedCa]) -> Client {
        let pieces: Vec<PmPiece> = shards
            .iter()
            .map(|shard| shard.export_public_matrix_piece())
            .collect();
        Client::from_pm_pieces(&pieces).unwrap()
    }

    #[test]
    fn combine_all_four_shards() {
        let shards = shard_set();
        let client = client_for(&shards);

        for count in (1..=8).rev() {
            let ident = format!("ident{count}");
            let public_key = client.query_pk(&ident);
            let pieces: Vec<SkPiece> =
                shards.iter().map(|shard| shard.query_sk(&ident)).collect();

            let private_key = client
                .combine_sk_pieces(&pieces, &public_key)
                .expect("four shards combine");
            assert_eq!(
                EdwardsPoint::mul_base(private_key.scalar()),
                *public_key.as_point()
            );
        }
    }

    #[test]
    fn combine_with_one_shard_missing() {
        let shards = shard_set();
        let client = client_for(&shards);

        for count in (1..=8).rev() {
            let ident = format!("ident{count}");
            let public_key = client.query_pk(&ident);
            let ban = count & 4;
            let pieces: Vec<SkPiece> = shards
                .iter()
                .filter(|shard| shard.index() != ban)
                .map(|shard| shard.query_sk(&ident))
                .collect();

            let private_key = client
                .combine_sk_pieces(&pieces, &public_key)
                .expect("remaining shards combine");
            assert_eq!(
                EdwardsPoint::mul_base(private_key.scalar()),
                *public_key.as_point()
            );
        }
    }

    #[test]
    fn combine_fails_with_a_parity_pair_broken() {
        let shards = shard_set();
        let client = client_for(&shards);

        let ident = "ident1";
        let public_key = client.query_pk(ident);
        // shards 0 and 3 are opposite-parity halves of different pairs
        let pieces = vec![shards[0].query_sk(ident), shards[3].query_sk(ident)];
        assert!(client.combine_sk_pieces(&pieces, &public_key).is_none());
    }

    #[test]
    fn pm_pieces_roundtrip_through_wire() {
        let shards = shard_set();
        let mut serializer = Serializer::new();
        for shard in &shards {
            shard.export_public_matrix_piece().serialize(&mut serializer);
        }

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        let pieces: Vec<PmPiece> = (0..shards.len())
            .map(|_| PmPiece::deserialize(&mut deserializer).unwrap())
            .collect();

        let client = Client::from_pm_pieces(&pieces).unwrap();
        let direct = client_for(&shards);
        assert_eq!(
            client.query_pk("ident1").to_bytes(),
            direct.query_pk("ident1").to_bytes()
        );
    }

    #[test]
    fn wrong_piece_set_rejected() {
        let shards = shard_set();
        let mut pieces: Vec<PmPiece> = shards
            .iter()
            .map(|shard| shard.export_public_matrix_piece())
            .collect();

        pieces.pop();
        assert!(matches!(
            Client::from_pm_pieces(&pieces),
            Err(Error::WrongPieceSet)
        ));

        // duplicates of one shard do not stand in for the missing one
        let dup = pieces[1].clone();
        pieces.push(dup);
        assert!(matches!(
            Client::from_pm_pieces(&pieces),
            Err(Error::WrongPieceSet)
        ));
    }

    #[test]
    fn disagreeing_parity_groups_rejected() {
        let shards = shard_set();
        let mut pieces: Vec<PmPiece> = shards
            .iter()
            .map(|shard| shard.export_public_matrix_piece())
            .collect();

        pieces[1].piece[7] = Ed25519Point::default();
        assert!(matches!(
            Client::from_pm_pieces(&pieces),
            Err(Error::PieceDisagreement(7))
        ));
    }

    #[test]
    fn cached_client_answers_like_the_client() {
        let shards = shard_set();
        let expected = client_for(&shards).query_pk("ident1");

        let mut cached = client_for(&shards).into_cached(4);
        assert_eq!(cached.query_pk("ident1"), expected);
        assert_eq!(cached.query_pk("ident1"), expected);
    }
}
