use std::fs;
use std::path::Path;
use tempfile::tempdir;
use zencrypt_core::{decrypt_file, encrypt_file, CryptoError, SymmetricKey};

fn test_key() -> SymmetricKey {
    SymmetricKey::from_slice(b"0123456789abcdef0123456789abcdef").unwrap()
}

fn round_trip(content: &[u8]) {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.bin");
    let enc = dir.path().join("cipher.zen");
    let out = dir.path().join("restored.bin");
    fs::write(&src, content).unwrap();

    let key = test_key();
    let written = encrypt_file(&src, &enc, &key).unwrap();
    assert_eq!(written, content.len() as u64);

    let restored = decrypt_file(&enc, &out, &key).unwrap();
    assert_eq!(restored, content.len() as u64);
    assert_eq!(fs::read(&out).unwrap(), content);
}

#[test]
fn small_binary_file_round_trips() {
    let content: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
    round_trip(&content);
}

#[test]
fn empty_file_round_trips() {
    round_trip(b"");
}

#[test]
fn file_spanning_multiple_chunks_round_trips() {
    // Two full 64 KiB chunks plus a ragged tail.
    let content: Vec<u8> = (0u8..=255).cycle().take(2 * 64 * 1024 + 7).collect();
    round_trip(&content);
}

#[test]
fn file_exactly_on_chunk_boundary_round_trips() {
    let content: Vec<u8> = (0u8..=255).cycle().take(64 * 1024).collect();
    round_trip(&content);
}

#[test]
fn encrypted_file_is_a_textual_envelope() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.txt");
    let enc = dir.path().join("cipher.zen");
    fs::write(&src, b"envelope format check").unwrap();
    encrypt_file(&src, &enc, &test_key()).unwrap();

    let text = fs::read_to_string(&enc).unwrap();
    let (iv, ct) = text.split_once(':').unwrap();
    assert_eq!(iv.len(), 32);
    assert!(iv.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(!ct.is_empty());
    assert_eq!(ct.len() % 32, 0);
    assert!(ct.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn missing_source_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = encrypt_file(
        &dir.path().join("does-not-exist"),
        &dir.path().join("out"),
        &test_key(),
    )
    .unwrap_err();
    assert!(matches!(err, CryptoError::Io(_)));
}

#[test]
fn wrong_key_never_restores_the_plaintext() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.bin");
    let enc = dir.path().join("cipher.zen");
    let out = dir.path().join("restored.bin");
    let content = b"contents protected by the right key".to_vec();
    fs::write(&src, &content).unwrap();

    encrypt_file(&src, &enc, &test_key()).unwrap();
    let wrong = SymmetricKey::from_slice(b"fedcba9876543210fedcba9876543210").unwrap();
    match decrypt_file(&enc, &out, &wrong) {
        Err(CryptoError::Padding) => assert!(!out.exists()),
        Err(other) => panic!("unexpected error kind: {other}"),
        Ok(_) => assert_ne!(fs::read(&out).unwrap(), content),
    }
}

#[test]
fn malformed_source_leaves_no_partial_output() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("not-an-envelope");
    let out = dir.path().join("restored.bin");
    fs::write(&bogus, b"this was never encrypted").unwrap();

    let err = decrypt_file(&bogus, &out, &test_key()).unwrap_err();
    assert!(matches!(err, CryptoError::Format(_)));
    assert!(!out.exists());
    assert!(no_stray_temp_files(dir.path()));
}

#[test]
fn truncated_ciphertext_is_a_format_error() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.bin");
    let enc = dir.path().join("cipher.zen");
    let out = dir.path().join("restored.bin");
    fs::write(&src, b"something long enough to truncate").unwrap();
    encrypt_file(&src, &enc, &test_key()).unwrap();

    // Drop one hex character so the ciphertext no longer comes in whole blocks.
    let text = fs::read_to_string(&enc).unwrap();
    fs::write(&enc, &text[..text.len() - 1]).unwrap();

    let err = decrypt_file(&enc, &out, &test_key()).unwrap_err();
    assert!(matches!(err, CryptoError::Format(_)));
    assert!(!out.exists());
}

#[test]
fn destination_is_overwritten() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.bin");
    let enc = dir.path().join("cipher.zen");
    let out = dir.path().join("restored.bin");
    fs::write(&src, b"fresh contents").unwrap();
    fs::write(&out, b"stale contents from an earlier run").unwrap();

    encrypt_file(&src, &enc, &test_key()).unwrap();
    decrypt_file(&enc, &out, &test_key()).unwrap();
    assert_eq!(fs::read(&out).unwrap(), b"fresh contents");
}

fn no_stray_temp_files(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().all(|entry| {
        let name = entry.unwrap().file_name();
        !name.to_string_lossy().starts_with(".tmp")
    })
}
