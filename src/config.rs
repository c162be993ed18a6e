//! Configuration for VariantKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a VariantKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the file store
    /// Internal structure:
    ///   {data_dir}/
    ///     └── store.bin        (snapshot of all entries)
    pub data_dir: PathBuf,

    /// File name of the store snapshot inside `data_dir`
    pub store_file: String,

    /// Maximum total size of keys + values (in bytes), `None` for unbounded
    pub quota_bytes: Option<usize>,

    /// When the file store writes its snapshot to disk
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Maximum nesting depth accepted by the encoder and decoder
    pub max_depth: usize,
}

/// File store sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Persist after every mutation (safest, slowest)
    EveryWrite,

    /// Persist only on explicit `flush()`
    Manual,
}

/// Default quota, matching the common browser storage limit (5 MiB)
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Default nesting limit for the codec
pub const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./variantkv_data"),
            store_file: "store.bin".to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            sync_strategy: SyncStrategy::EveryWrite,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the store snapshot file
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for the file store)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the snapshot file name
    pub fn store_file(mut self, name: impl Into<String>) -> Self {
        self.config.store_file = name.into();
        self
    }

    /// Set the store quota (in bytes)
    pub fn quota_bytes(mut self, quota: usize) -> Self {
        self.config.quota_bytes = Some(quota);
        self
    }

    /// Remove the store quota
    pub fn unbounded(mut self) -> Self {
        self.config.quota_bytes = None;
        self
    }

    /// Set the file store sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the maximum nesting depth for encoding/decoding
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
