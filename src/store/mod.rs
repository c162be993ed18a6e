//! Store Module
//!
//! The string key/value store that `VariantStorage` writes through.
//!
//! ## Contract
//! - `get(key)` returns the stored string or `None`
//! - `set(key, value)` may fail with the store's own error (e.g. quota)
//!   and must leave the store unchanged when it does
//! - `remove(key)` / `clear()` drop one or all entries
//!
//! Methods take `&self`; stores use interior mutability.
//!
//! ## Implementations
//! - [`MemoryStore`]: process-local map, optional quota
//! - [`FileStore`]: persistent snapshot file (the default store)

mod file;
mod memory;

pub use file::{FileStore, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use memory::MemoryStore;

/// Synchronous string key/value store
pub trait KeyValueStore {
    /// Native failure of the store, passed to callers untouched
    type Error: std::error::Error + 'static;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    fn remove(&self, key: &str) -> Result<(), Self::Error>;

    fn clear(&self) -> Result<(), Self::Error>;
}

/// Bytes an entry counts against a quota
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Check a quota for replacing `old` with `new` given the current usage;
/// returns the usage after the write
pub(crate) fn check_quota(
    quota: Option<usize>,
    usage: usize,
    key: &str,
    old: Option<&str>,
    new: &str,
) -> Result<usize, crate::error::StoreError> {
    let released = old.map_or(0, |v| entry_size(key, v));
    let required = usage - released + entry_size(key, new);
    match quota {
        Some(quota) if required > quota => Err(crate::error::StoreError::QuotaExceeded {
            key: key.to_string(),
            required,
            quota,
        }),
        _ => Ok(required),
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    type Error = S::Error;

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        (**self).clear()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        (**self).clear()
    }
}
