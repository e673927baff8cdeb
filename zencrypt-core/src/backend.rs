//! Asymmetric primitive behind a capability interface.
//!
//! The engine sequences parse -> unlock -> open itself and delegates the
//! cryptographic math here, so the primitive stays swappable across library
//! implementations. The default backend seals with an ephemeral X25519
//! keypair + XSalsa20-Poly1305, so the sender's identity is not revealed and
//! each seal is fresh.

use crate::error::{CryptoError, CryptoResult};
use crypto_box::aead::{Aead, AeadCore, OsRng};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use serde::{Deserialize, Serialize};

/// Message sealed for a recipient's public key.
///
/// The ephemeral public key is included so the recipient can reconstruct the
/// shared secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedMessage {
    /// Ephemeral X25519 public key (sender side of DH).
    pub ephemeral_public_key: [u8; 32],
    /// XSalsa20 nonce (24 bytes).
    pub nonce: [u8; 24],
    /// Ciphertext + Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

/// Interface the engine requires from an asymmetric-crypto library.
pub trait AsymmetricBackend {
    /// Produces `(secret, public)` key bytes.
    fn generate_keypair(&self) -> CryptoResult<([u8; 32], [u8; 32])>;

    /// Seals a plaintext for the holder of `recipient_public`.
    fn seal(&self, plaintext: &[u8], recipient_public: &[u8; 32]) -> CryptoResult<SealedMessage>;

    /// Opens a sealed message with the recipient's secret key.
    fn open(&self, sealed: &SealedMessage, secret: &[u8; 32]) -> CryptoResult<Vec<u8>>;
}

/// Default backend: crypto_box (X25519 + XSalsa20-Poly1305).
#[derive(Clone, Copy, Debug, Default)]
pub struct CryptoBoxBackend;

impl AsymmetricBackend for CryptoBoxBackend {
    fn generate_keypair(&self) -> CryptoResult<([u8; 32], [u8; 32])> {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Ok((secret.to_bytes(), *public.as_bytes()))
    }

    fn seal(&self, plaintext: &[u8], recipient_public: &[u8; 32]) -> CryptoResult<SealedMessage> {
        let recipient = PublicKey::from(*recipient_public);
        let ephemeral = SecretKey::generate(&mut OsRng);
        let ephemeral_public = ephemeral.public_key();
        let salsa_box = SalsaBox::new(&recipient, &ephemeral);

        let nonce = SalsaBox::generate_nonce(&mut OsRng);
        let ciphertext = salsa_box
            .encrypt(&nonce, plaintext)
            .map_err(|e| CryptoError::Encryption(format!("message seal failed: {e}")))?;

        Ok(SealedMessage {
            ephemeral_public_key: *ephemeral_public.as_bytes(),
            nonce: nonce.into(),
            ciphertext,
        })
    }

    fn open(&self, sealed: &SealedMessage, secret: &[u8; 32]) -> CryptoResult<Vec<u8>> {
        let ephemeral = PublicKey::from(sealed.ephemeral_public_key);
        let secret = SecretKey::from(*secret);
        let salsa_box = SalsaBox::new(&ephemeral, &secret);

        salsa_box
            .decrypt(
                crypto_box::Nonce::from_slice(&sealed.nonce),
                sealed.ciphertext.as_ref(),
            )
            .map_err(|_| {
                CryptoError::Decryption("message open failed (wrong key or tampered data)".to_string())
            })
    }
}
