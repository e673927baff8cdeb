//! Symmetric text encryption with a self-describing envelope.
//!
//! AES-256-CBC with PKCS#7 padding. Every call generates a fresh random IV,
//! and the envelope serializes as `<iv-hex>:<ciphertext-hex>` — both fields
//! hex-encoded so the `:` separator cannot appear inside either field and the
//! first-`:` split stays unambiguous.
//!
//! The envelope carries no authentication tag. Decrypting with a wrong key
//! usually fails the padding check, but it can also unpad cleanly and return
//! garbage; callers that need tamper detection must layer it on top.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{SymmetricKey, IV_SIZE};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

pub(crate) type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
pub(crate) type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes.
pub(crate) const BLOCK_SIZE: usize = 16;

/// IV + ciphertext: the unit actually stored or transmitted.
///
/// Only valid for the key used to create it. The parser fails closed on any
/// malformed input rather than letting a truncated envelope reach the cipher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherEnvelope {
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl CipherEnvelope {
    /// Parses the `<iv-hex>:<ciphertext-hex>` encoding.
    pub fn parse(s: &str) -> CryptoResult<Self> {
        let (iv_hex, ct_hex) = s
            .split_once(':')
            .ok_or_else(|| CryptoError::Format("missing ':' separator".to_string()))?;

        if iv_hex.len() != IV_SIZE * 2 {
            return Err(CryptoError::Format(format!(
                "IV must be {} hex characters, got {}",
                IV_SIZE * 2,
                iv_hex.len()
            )));
        }
        let iv_bytes =
            hex::decode(iv_hex).map_err(|e| CryptoError::Format(format!("bad IV hex: {e}")))?;

        let ciphertext = hex::decode(ct_hex)
            .map_err(|e| CryptoError::Format(format!("bad ciphertext hex: {e}")))?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::Format(format!(
                "ciphertext must be a non-empty multiple of {BLOCK_SIZE} bytes, got {}",
                ciphertext.len()
            )));
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&iv_bytes);
        Ok(Self { iv, ciphertext })
    }
}

impl fmt::Display for CipherEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for CipherEnvelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> CryptoResult<Self> {
        Self::parse(s)
    }
}

/// Generates a fresh random IV from the thread CSPRNG.
pub(crate) fn random_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Encrypts a plaintext under a 256-bit key with a fresh random IV.
///
/// Successive calls on identical inputs produce different envelopes because
/// the IV is random per call.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> CipherEnvelope {
    let iv = random_iv();
    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    CipherEnvelope { iv, ciphertext }
}

/// Decrypts an envelope with the key used to create it.
pub fn decrypt(envelope: &CipherEnvelope, key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    Aes256CbcDec::new(key.as_bytes().into(), (&envelope.iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
        .map_err(|_| CryptoError::Padding)
}

/// Decrypts an envelope and interprets the plaintext as UTF-8.
pub fn decrypt_string(envelope: &CipherEnvelope, key: &SymmetricKey) -> CryptoResult<String> {
    let plaintext = decrypt(envelope, key)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("plaintext is not valid UTF-8: {e}")))
}
