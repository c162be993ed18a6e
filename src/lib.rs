//! # VariantKV
//!
//! Typed key/value persistence on top of string-only stores:
//! - Rich values: numbers (NaN, ±0, ±Infinity), bigints, dates, patterns,
//!   arrays, maps, sets and records
//! - Shared and cyclic references survive a round trip
//! - Plain strings written by other code are read back unchanged
//! - Store errors (e.g. quota exceeded) reach the caller untouched
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     VariantStorage                           │
//! │               (get / set / get_as / remove)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │    Store    │
//!   │  (Value ⇄   │          │ (Memory or  │
//!   │   bytes)    │          │    File)    │
//!   └──────┬──────┘          └─────────────┘
//!          │                         ▲
//!          ▼                         │
//!   ┌─────────────┐                  │
//!   │   Framing   │──── "▒v1▒…" ─────┘
//!   │ (tag+base64)│
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use variantkv::{MemoryStore, Value, VariantStorage};
//! use variantkv::value::Array;
//!
//! let storage = VariantStorage::new(MemoryStore::new());
//!
//! let a = Array::new();
//! a.push(Value::Array(a.clone()));
//! storage.set("cycle", &Value::Array(a.clone())).unwrap();
//!
//! let restored = storage.get("cycle").unwrap().unwrap();
//! let restored = restored.as_array().unwrap();
//! assert!(restored.get(0).unwrap().is_same_instance(&Value::Array(restored.clone())));
//! # a.clear();
//! # restored.clear();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod codec;
pub mod framing;
pub mod store;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, SetError, StoreError, TypeMismatch, VariantError};
pub use config::{Config, SyncStrategy};
pub use value::Value;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use storage::{create_storage, VariantStorage};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of VariantKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
