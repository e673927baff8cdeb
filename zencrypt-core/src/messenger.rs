//! Asymmetric message encryption against armored key blocks.
//!
//! Sequencing is the engine's whole responsibility here: parse the key block,
//! unlock the private key with its passphrase, then open the message. A wrong
//! passphrase fails before any message parsing happens.

use crate::armor;
use crate::backend::{AsymmetricBackend, CryptoBoxBackend, SealedMessage};
use crate::error::{CryptoError, CryptoResult};
use crate::keypair;
use zeroize::Zeroize;

/// Encrypts a text message for the holder of an armored public key block.
///
/// Returns an armored `ZENCRYPT MESSAGE` block safe for text channels.
pub fn encrypt_message(plaintext: &str, recipient_public: &str) -> CryptoResult<String> {
    encrypt_message_with(&CryptoBoxBackend, plaintext, recipient_public)
}

/// [`encrypt_message`] against a caller-supplied backend.
pub fn encrypt_message_with(
    backend: &impl AsymmetricBackend,
    plaintext: &str,
    recipient_public: &str,
) -> CryptoResult<String> {
    let public = keypair::parse_public(recipient_public)?;
    let sealed = backend.seal(plaintext.as_bytes(), &public)?;
    let payload =
        serde_json::to_vec(&sealed).map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(armor::enarmor(armor::MESSAGE, &payload))
}

/// Decrypts an armored message with an armored private block + passphrase.
pub fn decrypt_message(armored: &str, private: &str, passphrase: &str) -> CryptoResult<String> {
    decrypt_message_with(&CryptoBoxBackend, armored, private, passphrase)
}

/// [`decrypt_message`] against a caller-supplied backend.
pub fn decrypt_message_with(
    backend: &impl AsymmetricBackend,
    armored: &str,
    private: &str,
    passphrase: &str,
) -> CryptoResult<String> {
    let mut secret = keypair::unlock(private, passphrase)?;
    let result = open_armored(backend, armored, &secret);
    secret.zeroize();
    result
}

fn open_armored(
    backend: &impl AsymmetricBackend,
    armored: &str,
    secret: &[u8; 32],
) -> CryptoResult<String> {
    let payload =
        armor::dearmor(armor::MESSAGE, armored).map_err(|e| CryptoError::Decryption(e.to_string()))?;
    let sealed: SealedMessage =
        serde_json::from_slice(&payload).map_err(|e| CryptoError::Decryption(e.to_string()))?;
    let plaintext = backend.open(&sealed, secret)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("plaintext is not valid UTF-8: {e}")))
}
