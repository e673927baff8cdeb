//! Key pair lifecycle: generation, persistence, loading, unlocking.
//!
//! Both halves of a pair travel as armored text blocks. The private block's
//! key material is encrypted with a passphrase-derived key
//! (Argon2id -> ChaCha20-Poly1305); the Argon2id salt rides inside the block
//! so the passphrase is the only input needed to unlock it. The passphrase
//! itself is never stored, logged, or returned.

use crate::armor;
use crate::backend::{AsymmetricBackend, CryptoBoxBackend};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KdfParams, Salt, SALT_SIZE};
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, KeyInit, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use zeroize::Zeroize;

/// Minimum passphrase length accepted at generation time.
pub const MIN_PASSPHRASE_LEN: usize = 8;

const NONCE_SIZE: usize = 12;

/// Who a key pair belongs to, embedded at generation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Both halves of a generated key pair, armored for transport.
///
/// Regeneration always produces a brand-new pair; nothing is mutated in
/// place.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: String,
    pub private: String,
}

#[derive(Serialize, Deserialize)]
struct PublicPacket {
    identity: Identity,
    created_at: i64,
    key: [u8; 32],
}

#[derive(Serialize, Deserialize)]
struct PrivatePacket {
    identity: Identity,
    created_at: i64,
    salt: [u8; SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
    /// Secret key bytes under the passphrase-derived key (AEAD, so a wrong
    /// passphrase fails fast instead of yielding a garbage key).
    ciphertext: Vec<u8>,
}

/// Generates a key pair with the default backend.
pub fn generate_keypair(identity: &Identity, passphrase: &str) -> CryptoResult<KeyPair> {
    generate_keypair_with(&CryptoBoxBackend, identity, passphrase)
}

/// Generates a key pair against a caller-supplied backend.
pub fn generate_keypair_with(
    backend: &impl AsymmetricBackend,
    identity: &Identity,
    passphrase: &str,
) -> CryptoResult<KeyPair> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(CryptoError::KeyGeneration(format!(
            "passphrase too short (min {MIN_PASSPHRASE_LEN} characters)"
        )));
    }
    if identity.name.trim().is_empty() {
        return Err(CryptoError::KeyGeneration(
            "identity name must not be empty".to_string(),
        ));
    }

    let (mut secret, public) = backend.generate_keypair()?;
    let created_at = chrono::Utc::now().timestamp();

    let salt = Salt::random();
    let kek = derive_key(passphrase, &salt, &KdfParams::default())?;
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);
    let ciphertext = ChaCha20Poly1305::new(kek.as_bytes().into())
        .encrypt(Nonce::from_slice(&nonce), secret.as_slice())
        .map_err(|e| CryptoError::KeyGeneration(format!("private key sealing failed: {e}")))?;
    secret.zeroize();

    let public_packet = PublicPacket {
        identity: identity.clone(),
        created_at,
        key: public,
    };
    let private_packet = PrivatePacket {
        identity: identity.clone(),
        created_at,
        salt: *salt.as_bytes(),
        nonce,
        ciphertext,
    };

    Ok(KeyPair {
        public: armor::enarmor(armor::PUBLIC_KEY, &to_payload(&public_packet)?),
        private: armor::enarmor(armor::PRIVATE_KEY, &to_payload(&private_packet)?),
    })
}

/// Writes key material to a file verbatim.
pub fn save_key<P: AsRef<Path>>(material: &str, path: P) -> CryptoResult<()> {
    fs::write(&path, material)?;
    debug!("wrote key material to {}", path.as_ref().display());
    Ok(())
}

/// Reads key material back from a file, byte-identical to what was saved.
pub fn load_key<P: AsRef<Path>>(path: P) -> CryptoResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Reads the embedded identity out of either armored block.
///
/// Never touches key material: no passphrase is needed, and none of the
/// private packet's ciphertext is opened.
pub fn public_identity(blob: &str) -> CryptoResult<Identity> {
    if let Ok(payload) = armor::dearmor(armor::PUBLIC_KEY, blob) {
        let packet: PublicPacket = from_payload(&payload)?;
        return Ok(packet.identity);
    }
    let payload =
        armor::dearmor(armor::PRIVATE_KEY, blob).map_err(|e| CryptoError::KeyFormat(e.to_string()))?;
    let packet: PrivatePacket = from_payload(&payload)?;
    Ok(packet.identity)
}

/// Extracts the raw public key from an armored public block.
pub(crate) fn parse_public(blob: &str) -> CryptoResult<[u8; 32]> {
    let payload =
        armor::dearmor(armor::PUBLIC_KEY, blob).map_err(|e| CryptoError::KeyFormat(e.to_string()))?;
    let packet: PublicPacket = from_payload(&payload)?;
    Ok(packet.key)
}

/// Unlocks an armored private block with its passphrase.
pub(crate) fn unlock(blob: &str, passphrase: &str) -> CryptoResult<[u8; 32]> {
    let payload =
        armor::dearmor(armor::PRIVATE_KEY, blob).map_err(|e| CryptoError::KeyFormat(e.to_string()))?;
    let packet: PrivatePacket = from_payload(&payload)?;

    let kek = derive_key(passphrase, &Salt::from_bytes(packet.salt), &KdfParams::default())?;
    let mut plaintext = ChaCha20Poly1305::new(kek.as_bytes().into())
        .decrypt(Nonce::from_slice(&packet.nonce), packet.ciphertext.as_ref())
        .map_err(|_| CryptoError::Passphrase)?;

    if plaintext.len() != 32 {
        let actual = plaintext.len();
        plaintext.zeroize();
        return Err(CryptoError::InvalidKeyLength {
            expected: 32,
            actual,
        });
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();
    Ok(bytes)
}

fn to_payload<T: Serialize>(packet: &T) -> CryptoResult<Vec<u8>> {
    serde_json::to_vec(packet).map_err(|e| CryptoError::KeyGeneration(e.to_string()))
}

fn from_payload<'a, T: Deserialize<'a>>(payload: &'a [u8]) -> CryptoResult<T> {
    serde_json::from_slice(payload).map_err(|e| CryptoError::KeyFormat(e.to_string()))
}
