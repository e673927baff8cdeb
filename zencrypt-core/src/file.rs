//! Streaming file encryption sharing the envelope rules of [`crate::cipher`].
//!
//! The IV is generated once per file and written first, so the whole file
//! never has to be resident: plaintext is pulled through the CBC chain in
//! fixed-size chunks and the ciphertext is hex-encoded incrementally.
//!
//! Both directions write to a temporary file in the destination directory and
//! persist it only on success, so a failed operation leaves no partial
//! destination file behind.

use crate::cipher::{random_iv, Aes256CbcDec, Aes256CbcEnc, BLOCK_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{SymmetricKey, IV_SIZE};
use aes::cipher::block_padding::{Padding, Pkcs7};
use aes::cipher::{Block, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Plaintext bytes processed per chunk. Must be a multiple of [`BLOCK_SIZE`].
const PLAIN_CHUNK: usize = 64 * 1024;

/// Hex characters read per chunk when decrypting; decodes to a block multiple.
const HEX_CHUNK: usize = 2 * PLAIN_CHUNK;

/// Encrypts a file, writing the textual envelope to `dest`.
///
/// Returns the number of plaintext bytes processed. The destination is
/// created or overwritten atomically.
pub fn encrypt_file<P: AsRef<Path>>(source: P, dest: P, key: &SymmetricKey) -> CryptoResult<u64> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    let mut reader = BufReader::new(File::open(source)?);
    let tmp = NamedTempFile::new_in(parent_dir(dest))?;
    let mut writer = BufWriter::new(tmp);

    let iv = random_iv();
    writer.write_all(hex::encode(iv).as_bytes())?;
    writer.write_all(b":")?;

    let mut enc = Aes256CbcEnc::new(key.as_bytes().into(), &iv.into());
    let mut total: u64 = 0;

    // Double-buffered so the final chunk is known before it is processed;
    // only the final chunk gets the padding block.
    let mut buf = vec![0u8; PLAIN_CHUNK];
    let mut next = vec![0u8; PLAIN_CHUNK];
    let mut len = read_full(&mut reader, &mut buf)?;

    loop {
        let next_len = read_full(&mut reader, &mut next)?;
        if next_len == 0 {
            total += len as u64;
            let full = len - len % BLOCK_SIZE;
            encrypt_blocks(&mut enc, &mut buf[..full]);
            writer.write_all(hex::encode(&buf[..full]).as_bytes())?;

            let mut tail = Block::<aes::Aes256>::default();
            let rem = len - full;
            tail[..rem].copy_from_slice(&buf[full..len]);
            Pkcs7::pad(&mut tail, rem);
            enc.encrypt_block_mut(&mut tail);
            writer.write_all(hex::encode(tail).as_bytes())?;
            break;
        }

        // read_full only comes up short at EOF, so buf holds a full chunk here.
        total += len as u64;
        encrypt_blocks(&mut enc, &mut buf);
        writer.write_all(hex::encode(&buf).as_bytes())?;
        std::mem::swap(&mut buf, &mut next);
        len = next_len;
    }

    let tmp = writer.into_inner().map_err(|e| CryptoError::Io(e.into()))?;
    tmp.persist(dest).map_err(|e| CryptoError::Io(e.error))?;
    debug!("encrypted {total} bytes to {}", dest.display());
    Ok(total)
}

/// Decrypts a file written by [`encrypt_file`], writing plaintext to `dest`.
///
/// Returns the number of plaintext bytes written. The destination is created
/// or overwritten atomically.
pub fn decrypt_file<P: AsRef<Path>>(source: P, dest: P, key: &SymmetricKey) -> CryptoResult<u64> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    let mut reader = BufReader::new(File::open(source)?);

    // Envelope header: 32 hex characters of IV plus the ':' separator.
    let mut header = [0u8; IV_SIZE * 2 + 1];
    let n = read_full(&mut reader, &mut header)?;
    if n != header.len() || header[IV_SIZE * 2] != b':' {
        return Err(CryptoError::Format(
            "truncated or malformed envelope header".to_string(),
        ));
    }
    let iv_bytes = hex::decode(&header[..IV_SIZE * 2])
        .map_err(|e| CryptoError::Format(format!("bad IV hex: {e}")))?;
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&iv_bytes);

    let tmp = NamedTempFile::new_in(parent_dir(dest))?;
    let mut writer = BufWriter::new(tmp);

    let mut dec = Aes256CbcDec::new(key.as_bytes().into(), (&iv).into());
    let mut total: u64 = 0;

    // The final plaintext block is withheld until EOF so its padding can be
    // stripped before it reaches the output.
    let mut held: Option<Block<aes::Aes256>> = None;
    let mut hex_buf = vec![0u8; HEX_CHUNK];

    loop {
        let n = read_full(&mut reader, &mut hex_buf)?;
        if n == 0 {
            break;
        }
        if n % (BLOCK_SIZE * 2) != 0 {
            return Err(CryptoError::Format(format!(
                "ciphertext hex must come in {}-character blocks, found {n} trailing characters",
                BLOCK_SIZE * 2
            )));
        }
        let mut chunk = hex::decode(&hex_buf[..n])
            .map_err(|e| CryptoError::Format(format!("bad ciphertext hex: {e}")))?;
        for block in chunk.chunks_exact_mut(BLOCK_SIZE) {
            let block = Block::<aes::Aes256>::from_mut_slice(block);
            dec.decrypt_block_mut(block);
            if let Some(prev) = held.replace(*block) {
                writer.write_all(prev.as_slice())?;
                total += BLOCK_SIZE as u64;
            }
        }
    }

    let last = held.ok_or_else(|| CryptoError::Format("envelope has no ciphertext".to_string()))?;
    let plaintext = Pkcs7::unpad(&last).map_err(|_| CryptoError::Padding)?;
    writer.write_all(plaintext)?;
    total += plaintext.len() as u64;

    let tmp = writer.into_inner().map_err(|e| CryptoError::Io(e.into()))?;
    tmp.persist(dest).map_err(|e| CryptoError::Io(e.error))?;
    debug!("decrypted {total} bytes to {}", dest.display());
    Ok(total)
}

fn encrypt_blocks(enc: &mut Aes256CbcEnc, data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        enc.encrypt_block_mut(Block::<aes::Aes256>::from_mut_slice(chunk));
    }
}

/// Reads until `buf` is full or EOF; a short count means EOF was reached.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Temp files must land next to the destination so `persist` stays a rename.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
