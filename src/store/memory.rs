//! In-memory store
//!
//! HashMap behind a parking_lot RwLock.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StoreError;

use super::{check_quota, KeyValueStore};

/// Process-local string store with an optional byte quota
pub struct MemoryStore {
    inner: RwLock<Inner>,
    quota: Option<usize>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, String>,
    /// Sum of key + value bytes
    usage: usize,
}

impl MemoryStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            quota: None,
        }
    }

    /// Store that refuses writes once keys + values exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Bytes currently counted against the quota
    pub fn usage(&self) -> usize {
        self.inner.read().usage
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let usage = check_quota(
            self.quota,
            inner.usage,
            key,
            inner.entries.get(key).map(String::as_str),
            value,
        )?;
        inner.entries.insert(key.to_string(), value.to_string());
        inner.usage = usage;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if let Some(old) = inner.entries.remove(key) {
            inner.usage -= super::entry_size(key, &old);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.usage = 0;
        Ok(())
    }
}
