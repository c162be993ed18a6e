//! Tests for MemoryStore
//!
//! These tests verify:
//! - Basic get/set/remove/clear operations
//! - Quota accounting and enforcement
//! - A rejected write leaves the store unchanged
//! - Shared access through references and Arc

use std::sync::Arc;
use std::thread;

use variantkv::{KeyValueStore, MemoryStore, StoreError};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_set_and_get() {
    let store = MemoryStore::new();
    store.set("key1", "value1").unwrap();

    assert_eq!(store.get("key1"), Some("value1".to_string()));
    assert_eq!(store.get("missing"), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_overwrite() {
    let store = MemoryStore::new();
    store.set("key", "first").unwrap();
    store.set("key", "second").unwrap();

    assert_eq!(store.get("key"), Some("second".to_string()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_empty_key_and_value() {
    let store = MemoryStore::new();
    store.set("", "").unwrap();

    assert_eq!(store.get(""), Some(String::new()));
}

#[test]
fn test_remove() {
    let store = MemoryStore::new();
    store.set("key", "value").unwrap();
    store.remove("key").unwrap();

    assert_eq!(store.get("key"), None);
    assert!(store.is_empty());
    assert_eq!(store.usage(), 0);

    // Removing a missing key is not an error
    store.remove("key").unwrap();
}

#[test]
fn test_clear() {
    let store = MemoryStore::new();
    for i in 0..10 {
        store.set(&format!("key{}", i), "value").unwrap();
    }
    store.clear().unwrap();

    assert!(store.is_empty());
    assert_eq!(store.usage(), 0);
    assert_eq!(store.get("key0"), None);
}

// =============================================================================
// Quota Tests
// =============================================================================

#[test]
fn test_usage_counts_key_and_value_bytes() {
    let store = MemoryStore::new();
    store.set("ab", "cde").unwrap();
    store.set("f", "").unwrap();

    assert_eq!(store.usage(), 6);
    assert_eq!(store.quota(), None);
}

#[test]
fn test_quota_exceeded() {
    let store = MemoryStore::with_quota(10);
    store.set("key", "12345").unwrap();

    let err = store.set("other", "123456").unwrap_err();
    assert!(err.is_quota_exceeded());
    match err {
        StoreError::QuotaExceeded {
            key,
            required,
            quota,
        } => {
            assert_eq!(key, "other");
            assert_eq!(required, 19);
            assert_eq!(quota, 10);
        }
        other => panic!("Expected QuotaExceeded, got {:?}", other),
    }
}

#[test]
fn test_quota_exceeded_leaves_store_unchanged() {
    let store = MemoryStore::with_quota(10);
    store.set("key", "12345").unwrap();

    assert!(store.set("key", "this is far too long").is_err());

    assert_eq!(store.get("key"), Some("12345".to_string()));
    assert_eq!(store.usage(), 8);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_quota_replacement_releases_old_bytes() {
    let store = MemoryStore::with_quota(10);
    store.set("key", "1234567").unwrap();
    assert_eq!(store.usage(), 10);

    // Same size as the entry it replaces
    store.set("key", "abcdefg").unwrap();
    assert_eq!(store.usage(), 10);

    store.set("key", "a").unwrap();
    assert_eq!(store.usage(), 4);
}

#[test]
fn test_quota_freed_by_remove() {
    let store = MemoryStore::with_quota(10);
    store.set("a", "123456789").unwrap();
    assert!(store.set("b", "1").is_err());

    store.remove("a").unwrap();
    store.set("b", "1").unwrap();
    assert_eq!(store.usage(), 2);
}

// =============================================================================
// Shared Access Tests
// =============================================================================

#[test]
fn test_store_through_reference() {
    fn write_through<S: KeyValueStore>(store: S) {
        store.set("shared", "yes").unwrap();
    }

    let store = MemoryStore::new();
    write_through(&store);

    assert_eq!(store.get("shared"), Some("yes".to_string()));
}

#[test]
fn test_concurrent_writes_through_arc() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store.set(&format!("t{}_k{}", t, i), "v").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 200);
    assert_eq!(store.get("t3_k49"), Some("v".to_string()));
}
