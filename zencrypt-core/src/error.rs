//! Engine error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
///
/// The engine never recovers silently: every failure aborts the single
/// operation with the specific kind, and nothing is retried (retrying a
/// decryption with the same inputs cannot succeed).
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed envelope: {0}")]
    Format(String),

    /// Padding check failed during symmetric decryption. The envelope carries
    /// no integrity tag, so this covers wrong keys and corrupted ciphertext
    /// alike — and some wrong keys unpad cleanly and yield garbage instead.
    #[error("padding check failed (wrong key or corrupted ciphertext)")]
    Padding,

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("malformed key block: {0}")]
    KeyFormat(String),

    #[error("wrong passphrase")]
    Passphrase,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
