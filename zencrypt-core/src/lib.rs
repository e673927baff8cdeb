//! Cryptographic operations engine for Zencrypt.
//!
//! Provides the operations the Zencrypt front ends (CLI menu, web app) invoke:
//! - Salted SHA-256 hashing with hex digests
//! - Symmetric text encryption (AES-256-CBC) with a self-describing
//!   `<iv-hex>:<ciphertext-hex>` envelope
//! - Streaming file encryption reusing the envelope rules, with atomic output
//! - Key-pair lifecycle: generation, verbatim persistence, passphrase-locked
//!   private keys (Argon2id -> ChaCha20-Poly1305)
//! - Asymmetric message encryption against armored key blocks
//!   (X25519 + XSalsa20-Poly1305 sealed envelopes by default, swappable via
//!   [`AsymmetricBackend`])
//!
//! Everything is synchronous and free of shared mutable state: each call
//! allocates its own IV and buffers, so independent calls may run
//! concurrently. Presentation, transport, and key storage are the callers'
//! problem.
//!
//! # Known limitation
//!
//! The symmetric envelope carries no authentication tag. Decrypting with a
//! wrong key usually fails the padding check but can also return garbage;
//! callers needing tamper detection must layer it on top.

mod armor;
pub mod backend;
pub mod cipher;
pub mod error;
pub mod file;
pub mod hash;
pub mod key;
pub mod keypair;
pub mod messenger;

pub use backend::{AsymmetricBackend, CryptoBoxBackend, SealedMessage};
pub use cipher::{decrypt, decrypt_string, encrypt, CipherEnvelope};
pub use error::{CryptoError, CryptoResult};
pub use file::{decrypt_file, encrypt_file};
pub use hash::{hash, hash_bytes, verify};
pub use key::{
    derive_key, generate_random_key, KdfParams, Salt, SymmetricKey, IV_SIZE, KEY_SIZE, SALT_SIZE,
};
pub use keypair::{
    generate_keypair, generate_keypair_with, load_key, public_identity, save_key, Identity,
    KeyPair, MIN_PASSPHRASE_LEN,
};
pub use messenger::{
    decrypt_message, decrypt_message_with, encrypt_message, encrypt_message_with,
};
