//! Error types for CPK operations

use thiserror::Error;

/// Result type alias for CPK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the library boundary
#[derive(Debug, Error)]
pub enum Error {
    /// Deserializer ran past the end of its buffer
    #[error("deserializer stream eof")]
    StreamEof,

    /// Negative or oversized length prefix
    #[error("bad length prefix: {0}")]
    BadLengthPrefix(i64),

    /// String payload is not valid UTF-8
    #[error("bad utf-8 string")]
    BadString,

    /// Bytes are not a canonical scalar encoding
    #[error("bad scalar encoding")]
    BadScalar,

    /// Bytes are not a valid curve point encoding
    #[error("bad point encoding")]
    BadPoint,

    /// Signature blob has the wrong length or non-canonical scalars
    #[error("bad signature encoding")]
    BadSignature,

    /// Peer public key is the identity point
    #[error("kx: bad public key")]
    KxBadPublicKey,

    /// Sealed box is shorter than a nonce
    #[error("cipher: too small secret")]
    CipherTooSmall,

    /// Authentication tag mismatch
    #[error("cipher: verification failed")]
    CipherVerification,

    /// Password record is not `hex(salt):hex(mac)`
    #[error("pwd: record illegal")]
    PasswordRecord,

    /// Password does not match the record
    #[error("pwd: not correct")]
    PasswordMismatch,

    /// Public-matrix combination received the wrong shard set
    #[error("pm pieces: expected two shards of each parity covering the matrix")]
    WrongPieceSet,

    /// The two parity groups reconstruct different matrices
    #[error("pm pieces: parity groups disagree at cell {0}")]
    PieceDisagreement(usize),
}
