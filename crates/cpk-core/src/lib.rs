//! # CPK Core
//!
//! Combined Public Key (CPK) identity-based cryptosystem over Ed25519.
//!
//! An identity string deterministically selects 32 cells out of a fixed
//! 32x32 matrix of curve scalars; summing the selected cells yields that
//! identity's private key, and summing the matching cells of the public
//! (point) matrix yields the corresponding public key. The private matrix
//! can be held by a single certificate authority or split into four shards
//! across independent authorities so that no single node knows a user's
//! full secret.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cpk_core::cpk::{Client, DistributedCa};
//!
//! let shards: Vec<DistributedCa> = (0..4)
//!     .map(|i| DistributedCa::new(i, if i < 2 { "seed-a" } else { "seed-b" }))
//!     .collect();
//! let pieces: Vec<_> = shards.iter().map(|ca| ca.export_public_matrix_piece()).collect();
//! let client = Client::from_pm_pieces(&pieces)?;
//!
//! let pk = client.query_pk("alice");
//! let sk_pieces: Vec<_> = shards.iter().map(|ca| ca.query_sk("alice")).collect();
//! let sk = client.combine_sk_pieces(&sk_pieces, &pk).expect("pieces combine");
//! ```

pub mod cache;
pub mod cipher;
pub mod cpk;
pub mod curve;
pub mod error;
pub mod hasher;
pub mod hashstream;
pub mod keys;
pub mod password;
pub mod serializer;

pub use cache::LruCache;
pub use cipher::Cipher;
pub use curve::{Ed25519Point, Ed25519Scalar};
pub use error::{Error, Result};
pub use hasher::Hasher;
pub use hashstream::HashStream;
pub use keys::{PrivateKey, PublicKey, Signature};
pub use serializer::{Deserializer, Serializable, Serializer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
