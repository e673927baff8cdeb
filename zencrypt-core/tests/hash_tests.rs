use zencrypt_core::hash::{hash, hash_bytes, verify};

#[test]
fn digest_is_deterministic() {
    let a = hash("the quick brown fox", "salt");
    let b = hash("the quick brown fox", "salt");
    assert_eq!(a, b);
}

#[test]
fn digest_is_64_lowercase_hex_chars() {
    let digest = hash("anything at all", "with salt");
    assert_eq!(digest.len(), 64);
    assert!(digest
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn empty_salt_matches_plain_sha256() {
    // Known SHA-256 vector.
    assert_eq!(
        hash("hello world", ""),
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
}

#[test]
fn different_salts_give_different_digests() {
    assert_ne!(hash("password", "salt-one"), hash("password", "salt-two"));
}

#[test]
fn salt_is_appended_not_prepended() {
    // text || salt: both concatenations spell "abc", so the digests match...
    assert_eq!(hash("ab", "c"), hash("a", "bc"));
    // ...but salt-first would spell "cab" and must not.
    assert_ne!(hash("ab", "c"), hash("c", "ab"));
}

#[test]
fn bytes_and_str_forms_agree() {
    assert_eq!(hash("text", "salt"), hash_bytes(b"text", b"salt"));
}

#[test]
fn verify_accepts_matching_digest() {
    let digest = hash("secret", "pepper");
    assert!(verify("secret", "pepper", &digest));
    assert!(verify("secret", "pepper", &digest.to_uppercase()));
}

#[test]
fn verify_rejects_wrong_inputs() {
    let digest = hash("secret", "pepper");
    assert!(!verify("secret", "other-salt", &digest));
    assert!(!verify("other-text", "pepper", &digest));
    assert!(!verify("secret", "pepper", "not-a-digest"));
}
