//! Storage Adapter
//!
//! Typed `get`/`set` over a string key/value store.
//!
//! ## Pipeline
//! ```text
//! set:  Value ──serialize──▶ bytes ──frame──▶ "▒v1▒…" ──▶ store.set
//! get:  store.get ──▶ "▒v…▒…" ──unframe──▶ bytes ──deserialize──▶ Value
//!                 └─▶ untagged text ──────────────────────────▶ Value::String
//! ```
//!
//! ## Errors
//! - Codec and framing failures become [`VariantError`]
//! - Store failures pass through unchanged as [`SetError::Store`]
//! - Encoding happens entirely before the store is touched, so a failed
//!   `set` never writes

use crate::codec::{self, CodecOptions};
use crate::config::Config;
use crate::error::{SetError, StoreError, TypeMismatch, VariantError};
use crate::framing;
use crate::store::{FileStore, KeyValueStore};
use crate::value::Value;

/// Typed view of a string key/value store
///
/// Stateless apart from the wrapped store; encode/decode tables are local
/// to each call.
pub struct VariantStorage<S: KeyValueStore> {
    store: S,
    options: CodecOptions,
}

/// Open the default persistent store (`Config::default()`)
pub fn create_storage() -> Result<VariantStorage<FileStore>, StoreError> {
    VariantStorage::open(Config::default())
}

impl VariantStorage<FileStore> {
    /// Open a file store from `config` and wrap it
    pub fn open(config: Config) -> Result<Self, StoreError> {
        let store = FileStore::open(&config)?;
        Ok(Self::with_config(store, &config))
    }
}

impl<S: KeyValueStore> VariantStorage<S> {
    /// Wrap `store` with default codec limits
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: CodecOptions::default(),
        }
    }

    /// Wrap `store` with the codec limits from `config`
    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            options: CodecOptions::from(config),
        }
    }

    /// Encode `value` and store it under `key`
    ///
    /// Returns `SetError::Variant` if the value cannot be encoded (nothing
    /// is written), or `SetError::Store` carrying the store's own error.
    pub fn set(&self, key: &str, value: &Value) -> Result<(), SetError<S::Error>> {
        let text = self.encode(key, value)?;
        tracing::debug!(key, kind = value.type_name(), chars = text.len(), "set");
        self.store.set(key, &text).map_err(SetError::Store)
    }

    /// Read and decode the value under `key`
    ///
    /// Returns:
    /// - `Ok(None)`: key not present (distinct from a stored null/undefined)
    /// - `Ok(Some(Value::String(raw)))`: untagged text written by other code
    /// - `Ok(Some(value))`: decoded value
    pub fn get(&self, key: &str) -> Result<Option<Value>, VariantError> {
        let Some(raw) = self.store.get(key) else {
            tracing::debug!(key, "get: key not found");
            return Ok(None);
        };

        if !framing::is_framed(&raw) {
            tracing::debug!(key, chars = raw.len(), "get: plain string");
            return Ok(Some(Value::String(raw)));
        }

        let value = self.decode(key, &raw)?;
        tracing::debug!(key, kind = value.type_name(), "get");
        Ok(Some(value))
    }

    /// `get` followed by a conversion to `T`
    pub fn get_as<T>(&self, key: &str) -> Result<Option<T>, VariantError>
    where
        T: TryFrom<Value, Error = TypeMismatch>,
    {
        match self.get(key)? {
            Some(value) => T::try_from(value)
                .map(Some)
                .map_err(|source| VariantError::TypeMismatch {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Remove `key` from the store
    pub fn remove(&self, key: &str) -> Result<(), S::Error> {
        self.store.remove(key)
    }

    /// The wrapped store
    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Unwrap, returning the store
    pub fn into_inner(self) -> S {
        self.store
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn encode(&self, key: &str, value: &Value) -> Result<String, VariantError> {
        let bytes = codec::serialize_with(value, &self.options)
            .map_err(|e| VariantError::encode(key, value, e))?;
        Ok(framing::frame(&bytes))
    }

    fn decode(&self, key: &str, raw: &str) -> Result<Value, VariantError> {
        let result = framing::unframe(raw)
            .and_then(|bytes| codec::deserialize_with(&bytes, &self.options));
        result.map_err(|e| {
            tracing::warn!(key, "Corrupt payload: {}", e);
            VariantError::decode(key, raw, e)
        })
    }
}
