//! Tests for create_storage
//!
//! `create_storage` resolves the default data directory against the working
//! directory, so this target holds a single test that changes it.

use std::env;

use tempfile::TempDir;
use variantkv::config::Config;
use variantkv::{create_storage, KeyValueStore, Value};

#[test]
fn test_create_storage_uses_default_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let previous_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();

    let defaults = Config::default();
    {
        let storage = create_storage().unwrap();
        assert!(storage.storage().is_empty());
        storage.set("n", &Value::Number(-0.0)).unwrap();
    }

    let snapshot = temp_dir.path().join(&defaults.data_dir).join(&defaults.store_file);
    assert!(snapshot.exists());

    let storage = create_storage().unwrap();
    let restored = storage.get("n").unwrap().and_then(|v| v.as_number());
    assert!(restored.map_or(false, |n| n == 0.0 && n.is_sign_negative()));
    assert_eq!(storage.storage().get("missing"), None);
    drop(storage);

    env::set_current_dir(previous_dir).unwrap();
}
