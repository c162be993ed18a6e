//! File-backed store
//!
//! Keeps entries in memory and persists them as one snapshot file.
//!
//! ## File Format
//! ```text
//! ┌──────────┬────────────┬──────────┬──────────┬──────────────────────┐
//! │Magic (4) │Version (2) │ CRC (4)  │ Len (8)  │ Body (bincode map)   │
//! └──────────┴────────────┴──────────┴──────────┴──────────────────────┘
//! ```
//! Integers are little-endian; the CRC32 covers the body. Snapshots are
//! written to a temporary file and renamed over the old one.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::{Config, SyncStrategy};
use crate::error::StoreError;

use super::{check_quota, entry_size, KeyValueStore};

/// Magic bytes at the start of a snapshot file
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"VKVS";

/// Snapshot file format version
pub const SNAPSHOT_VERSION: u16 = 1;

/// magic (4) + version (2) + crc (4) + body length (8)
const HEADER_SIZE: usize = 18;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    entries: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct Snapshot {
    entries: BTreeMap<String, String>,
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    usage: usize,
    /// Mutations not yet persisted (Manual sync only)
    dirty: bool,
}

/// Persistent string store
pub struct FileStore {
    path: PathBuf,
    inner: RwLock<Inner>,
    quota: Option<usize>,
    sync_strategy: SyncStrategy,
}

impl FileStore {
    /// Open or create the store described by `config`
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Load and verify the snapshot if one exists
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir)?;
        let path = config.store_path();

        let entries = if path.exists() {
            Self::load(&path)?
        } else {
            BTreeMap::new()
        };
        let usage = entries.iter().map(|(k, v)| entry_size(k, v)).sum();

        tracing::info!(
            path = %path.display(),
            entries = entries.len(),
            usage,
            "Opened file store"
        );

        Ok(Self {
            path,
            inner: RwLock::new(Inner {
                entries,
                usage,
                dirty: false,
            }),
            quota: config.quota_bytes,
            sync_strategy: config.sync_strategy,
        })
    }

    /// Open with a directory (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let config = Config::builder().data_dir(path).build();
        Self::open(&config)
    }

    /// Persist pending changes
    pub fn flush(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.dirty {
            self.persist(&inner.entries)?;
            inner.dirty = false;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn usage(&self) -> usize {
        self.inner.read().usage
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.sync_strategy
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = fs::read(path)?;
        if bytes.len() < HEADER_SIZE {
            return Err(StoreError::Corrupt(format!(
                "snapshot too short: {} bytes",
                bytes.len()
            )));
        }

        let (header, body) = bytes.split_at(HEADER_SIZE);
        if &header[0..4] != SNAPSHOT_MAGIC {
            return Err(StoreError::Corrupt("bad magic".to_string()));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported snapshot version {}",
                version
            )));
        }

        let stored_crc = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&header[10..18]);
        let body_len = u64::from_le_bytes(len_bytes);
        if body_len != body.len() as u64 {
            return Err(StoreError::Corrupt(format!(
                "body length mismatch: header says {}, file has {}",
                body_len,
                body.len()
            )));
        }

        let actual_crc = crc32fast::hash(body);
        if actual_crc != stored_crc {
            return Err(StoreError::Corrupt(format!(
                "CRC mismatch: expected {:08x}, got {:08x}",
                stored_crc, actual_crc
            )));
        }

        let snapshot: Snapshot = bincode::deserialize(body)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(snapshot.entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let body = bincode::serialize(&SnapshotRef { entries })
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(SNAPSHOT_MAGIC)?;
            file.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
            file.write_all(&crc32fast::hash(&body).to_le_bytes())?;
            file.write_all(&(body.len() as u64).to_le_bytes())?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            bytes = HEADER_SIZE + body.len(),
            "Persisted snapshot"
        );
        Ok(())
    }

    /// Persist now or mark dirty, depending on the sync strategy
    fn commit(&self, inner: &mut Inner) -> Result<(), StoreError> {
        match self.sync_strategy {
            SyncStrategy::EveryWrite => self.persist(&inner.entries),
            SyncStrategy::Manual => {
                inner.dirty = true;
                Ok(())
            }
        }
    }
}

impl KeyValueStore for FileStore {
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

        let previous = inner.entries.insert(key.to_string(), value.to_string());
        let previous_usage = std::mem::replace(&mut inner.usage, usage);

        if let Err(e) = self.commit(&mut inner) {
            // Roll back so a failed write leaves the store unchanged
            match previous {
                Some(old) => inner.entries.insert(key.to_string(), old),
                None => inner.entries.remove(key),
            };
            inner.usage = previous_usage;
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let Some(old) = inner.entries.remove(key) else {
            return Ok(());
        };
        let released = entry_size(key, &old);
        inner.usage -= released;

        if let Err(e) = self.commit(&mut inner) {
            inner.entries.insert(key.to_string(), old);
            inner.usage += released;
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let entries = std::mem::take(&mut inner.entries);
        let usage = std::mem::replace(&mut inner.usage, 0);

        if let Err(e) = self.commit(&mut inner) {
            inner.entries = entries;
            inner.usage = usage;
            return Err(e);
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), "Failed to flush file store: {}", e);
        }
    }
}
