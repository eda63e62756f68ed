//! Boot-path integration tests — key loading in every failure mode.
//!
//! Run with: cargo test -p firmware --test integration_boot

#![allow(clippy::unwrap_used, clippy::expect_used)]

use firmware::boot::{load_vault, KeyLoadOutcome, KEY_FILE_MAX};
use platform::mocks::MemStorage;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use ui::RsaBadge;

/// 1024-bit keys keep keygen fast; the loader is size-agnostic.
fn test_key_pem() -> (RsaPrivateKey, String) {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("keygen");
    let pem = key.to_pkcs8_pem(LineEnding::LF).expect("pem");
    (key, pem.to_string())
}

#[tokio::test]
async fn valid_key_file_enables_the_vault() {
    let (key, pem) = test_key_pem();
    let mut storage = MemStorage::new().with_file("private.pem", pem.as_bytes());

    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::Loaded);
    assert_eq!(outcome.badge(), RsaBadge::Enabled);
    assert!(vault.is_enabled());

    // The loaded vault actually decrypts: full off-device round trip.
    let msg = b"over-the-air secret";
    let ciphertext = RsaPublicKey::from(&key)
        .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, msg)
        .expect("encrypt");
    assert_eq!(vault.decrypt(&ciphertext).unwrap().as_slice(), msg);
}

#[tokio::test]
async fn missing_key_file_degrades() {
    let mut storage = MemStorage::new();
    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::Missing);
    assert_eq!(outcome.badge(), RsaBadge::Disabled);
    assert!(!vault.is_enabled());
    // Decrypt can never succeed without a key.
    assert!(vault.decrypt(&[0u8; 256]).is_err());
}

#[tokio::test]
async fn unreadable_key_file_degrades() {
    let (_, pem) = test_key_pem();
    let mut storage = MemStorage::new()
        .with_file("private.pem", pem.as_bytes())
        .fail_reads();
    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::Unreadable);
    assert!(!vault.is_enabled());
}

#[tokio::test]
async fn oversized_key_file_degrades() {
    let big = vec![b'A'; KEY_FILE_MAX + 1];
    let mut storage = MemStorage::new().with_file("private.pem", &big);
    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::Unreadable);
    assert!(!vault.is_enabled());
}

#[tokio::test]
async fn garbage_key_file_degrades() {
    let mut storage = MemStorage::new().with_file("private.pem", b"-----BEGIN GARBAGE-----");
    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::ParseFailed);
    assert!(!vault.is_enabled());
}

#[tokio::test]
async fn binary_key_file_degrades() {
    let mut storage = MemStorage::new().with_file("private.pem", &[0xFFu8, 0x00, 0x80, 0x01]);
    let (vault, outcome) = load_vault(&mut storage).await;
    assert_eq!(outcome, KeyLoadOutcome::ParseFailed);
    assert!(!vault.is_enabled());
}
