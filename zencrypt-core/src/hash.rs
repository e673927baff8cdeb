//! Salted SHA-256 digests.
//!
//! The digest is computed over `text || salt` — the salt is appended, not
//! prepended, and callers must keep that order for digests to reproduce.

use sha2::{Digest, Sha256};

/// Hashes a text with an optional salt (empty salt is permitted).
///
/// Pure function: identical `(text, salt)` always yields the identical
/// 64-character lowercase hex digest.
pub fn hash(text: &str, salt: &str) -> String {
    hash_bytes(text.as_bytes(), salt.as_bytes())
}

/// Byte-slice form of [`hash`].
pub fn hash_bytes(data: &[u8], salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(salt);
    hex::encode(hasher.finalize())
}

/// Recomputes the digest and compares against `expected_hex`.
///
/// The comparison is case-insensitive on the expected digest so digests
/// copied from uppercase sources still verify.
pub fn verify(text: &str, salt: &str, expected_hex: &str) -> bool {
    hash(text, salt) == expected_hex.to_ascii_lowercase()
}
