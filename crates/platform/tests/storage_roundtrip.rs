//! Tests for the storage traits and the whole-file read helper.
//!
//! Run with: cargo test -p platform

#![allow(clippy::unwrap_used)]

use platform::mocks::{MemStorage, MemStorageError};
use platform::{read_to_vec, Storage, StorageError};

#[tokio::test]
async fn read_to_vec_returns_full_contents() {
    let mut storage = MemStorage::new().with_file("private.pem", b"-----BEGIN-----");
    let mut file = storage.open_file("private.pem").await.unwrap();

    let bytes: heapless::Vec<u8, 256> = read_to_vec(&mut file).await.unwrap();
    assert_eq!(bytes.as_slice(), b"-----BEGIN-----");
}

#[tokio::test]
async fn read_to_vec_spans_multiple_chunks() {
    // 300 bytes forces several 64-byte reads through the helper.
    let big: Vec<u8> = (0..300u16).map(|i| (i % 251) as u8).collect();
    let mut storage = MemStorage::new().with_file("key", &big);
    let mut file = storage.open_file("key").await.unwrap();

    let bytes: heapless::Vec<u8, 512> = read_to_vec(&mut file).await.unwrap();
    assert_eq!(bytes.as_slice(), big.as_slice());
}

#[tokio::test]
async fn read_to_vec_rejects_oversized_file_up_front() {
    let big = vec![0u8; 200];
    let mut storage = MemStorage::new().with_file("key", &big);
    let mut file = storage.open_file("key").await.unwrap();

    let result: Result<heapless::Vec<u8, 128>, _> = read_to_vec(&mut file).await;
    assert_eq!(result.unwrap_err(), StorageError::TooLarge);
}

#[tokio::test]
async fn read_to_vec_surfaces_io_failure() {
    let mut storage = MemStorage::new().with_file("key", b"data").fail_reads();
    let mut file = storage.open_file("key").await.unwrap();

    let result: Result<heapless::Vec<u8, 128>, _> = read_to_vec(&mut file).await;
    assert_eq!(result.unwrap_err(), StorageError::Io);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let mut storage = MemStorage::new();
    assert!(!storage.exists("private.pem").await.unwrap());
    let err = storage.open_file("private.pem").await.map(|_| ()).unwrap_err();
    assert_eq!(err, MemStorageError::NotFound);
}

#[tokio::test]
async fn list_root_reports_names_and_sizes() {
    let mut storage = MemStorage::new()
        .with_file("private.pem", b"0123456789")
        .with_file("notes.txt", b"x");

    let mut seen: Vec<(String, u64)> = Vec::new();
    storage
        .list_root(&mut |name, size| seen.push((name.to_string(), size)))
        .await
        .unwrap();

    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&("private.pem".to_string(), 10)));
    assert!(seen.contains(&("notes.txt".to_string(), 1)));
}
