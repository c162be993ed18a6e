//! Tests for FileStore
//!
//! These tests verify:
//! - Entries survive close and reopen
//! - Snapshot corruption is detected on open
//! - Manual sync defers writes until flush (or drop)
//! - Quota enforcement matches the in-memory store

use std::fs;

use tempfile::TempDir;
use variantkv::config::{Config, SyncStrategy};
use variantkv::store::SNAPSHOT_MAGIC;
use variantkv::{FileStore, KeyValueStore, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FileStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open_path(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn manual_config(dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(dir.path())
        .sync_strategy(SyncStrategy::Manual)
        .build()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("nested").join("store");

    let config = Config::builder().data_dir(&data_dir).build();
    let store = FileStore::open(&config).unwrap();

    assert!(data_dir.exists());
    assert!(store.is_empty());
    assert_eq!(store.path(), config.store_path());
}

#[test]
fn test_open_without_writes_creates_no_file() {
    let (_temp_dir, store) = setup_temp_store();
    assert!(!store.path().exists());
}

#[test]
fn test_persist_and_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = FileStore::open_path(temp_dir.path()).unwrap();
        store.set("key1", "value1").unwrap();
        store.set("key2", "\u{2592}v1\u{2592}Zm9v").unwrap();
        assert!(store.path().exists());
    }

    let store = FileStore::open_path(temp_dir.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("key1"), Some("value1".to_string()));
    assert_eq!(store.get("key2"), Some("\u{2592}v1\u{2592}Zm9v".to_string()));
    assert_eq!(store.usage(), 4 + 6 + 4 + "\u{2592}v1\u{2592}Zm9v".len());
}

#[test]
fn test_remove_and_clear_persist() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = FileStore::open_path(temp_dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();
    }

    {
        let store = FileStore::open_path(temp_dir.path()).unwrap();
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some("2".to_string()));
        store.clear().unwrap();
    }

    let store = FileStore::open_path(temp_dir.path()).unwrap();
    assert!(store.is_empty());
}

// =============================================================================
// Sync Strategy Tests
// =============================================================================

#[test]
fn test_manual_sync_defers_until_flush() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(&manual_config(&temp_dir)).unwrap();
    assert_eq!(store.sync_strategy(), SyncStrategy::Manual);

    store.set("key", "value").unwrap();
    assert!(!store.path().exists());

    store.flush().unwrap();
    assert!(store.path().exists());

    let reopened = FileStore::open(&manual_config(&temp_dir)).unwrap();
    assert_eq!(reopened.get("key"), Some("value".to_string()));
}

#[test]
fn test_manual_sync_flushes_on_drop() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = FileStore::open(&manual_config(&temp_dir)).unwrap();
        store.set("key", "value").unwrap();
    }

    let store = FileStore::open(&manual_config(&temp_dir)).unwrap();
    assert_eq!(store.get("key"), Some("value".to_string()));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_corrupt_body_detected() {
    let temp_dir = TempDir::new().unwrap();
    let path = {
        let store = FileStore::open_path(temp_dir.path()).unwrap();
        store.set("key", "value").unwrap();
        store.path().to_path_buf()
    };

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    match FileStore::open_path(temp_dir.path()) {
        Err(StoreError::Corrupt(message)) => assert!(message.contains("CRC"), "{}", message),
        Err(e) => panic!("Expected Corrupt, got {:?}", e),
        Ok(_) => panic!("Expected Corrupt, store opened"),
    }
}

#[test]
fn test_bad_magic_detected() {
    let temp_dir = TempDir::new().unwrap();
    let path = {
        let store = FileStore::open_path(temp_dir.path()).unwrap();
        store.set("key", "value").unwrap();
        store.path().to_path_buf()
    };

    let mut bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], SNAPSHOT_MAGIC);
    bytes[0] = b'X';
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        FileStore::open_path(temp_dir.path()),
        Err(StoreError::Corrupt(_))
    ));
}

#[test]
fn test_truncated_file_detected() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    fs::write(config.store_path(), b"VKVS").unwrap();

    assert!(matches!(
        FileStore::open(&config),
        Err(StoreError::Corrupt(_))
    ));
}

// =============================================================================
// Quota Tests
// =============================================================================

#[test]
fn test_quota_exceeded_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .quota_bytes(16)
        .build();

    {
        let store = FileStore::open(&config).unwrap();
        store.set("key", "small").unwrap();

        let err = store.set("key", "much larger than the quota").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(store.get("key"), Some("small".to_string()));
    }

    let store = FileStore::open(&config).unwrap();
    assert_eq!(store.get("key"), Some("small".to_string()));
    assert_eq!(store.usage(), 8);
}

#[test]
fn test_unbounded_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .unbounded()
        .build();
    let store = FileStore::open(&config).unwrap();

    let big = "x".repeat(64 * 1024);
    store.set("big", &big).unwrap();
    assert_eq!(store.get("big").map(|v| v.len()), Some(big.len()));
}
