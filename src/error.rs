//! Error types for VariantKV
//!
//! Internal failures (codec, framing) are collected in [`CodecError`] and
//! surfaced to callers as [`VariantError`]. Errors raised by the underlying
//! store are never folded into [`VariantError`]; [`SetError`] keeps them
//! apart so "store is full" stays distinguishable from "value is malformed".

use thiserror::Error;

/// Result type alias using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;

/// Maximum number of characters of a value/payload quoted in error messages
const PREVIEW_LIMIT: usize = 120;

/// Internal error type for the encoding pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    // -------------------------------------------------------------------------
    // Binary Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding failure: {0}")]
    Encoding(String),

    #[error("Decoding failure: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Transport Framing Errors
    // -------------------------------------------------------------------------
    #[error("Framing failure: {0}")]
    Framing(String),
}

/// A value could not be converted to the requested Rust type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Caller-facing error for values that could not be stored or read back
#[derive(Debug, Clone, Error)]
pub enum VariantError {
    #[error("Unable to encode value for key '{key}': '{value}'\n{source}")]
    Encode {
        key: String,
        value: String,
        #[source]
        source: CodecError,
    },

    #[error("Unable to decode value for key '{key}': '{raw}'\n{source}")]
    Decode {
        key: String,
        raw: String,
        #[source]
        source: CodecError,
    },

    #[error("Unexpected value type for key '{key}': {source}")]
    TypeMismatch {
        key: String,
        #[source]
        source: TypeMismatch,
    },
}

impl VariantError {
    pub(crate) fn encode(key: &str, value: impl std::fmt::Display, source: CodecError) -> Self {
        Self::Encode {
            key: key.to_string(),
            value: preview(value),
            source,
        }
    }

    pub(crate) fn decode(key: &str, raw: &str, source: CodecError) -> Self {
        Self::Decode {
            key: key.to_string(),
            raw: preview(raw),
            source,
        }
    }

    /// The key the failed operation was addressing
    pub fn key(&self) -> &str {
        match self {
            Self::Encode { key, .. } | Self::Decode { key, .. } | Self::TypeMismatch { key, .. } => key,
        }
    }

    /// The underlying codec failure, if any
    pub fn codec_error(&self) -> Option<&CodecError> {
        match self {
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::TypeMismatch { .. } => None,
        }
    }
}

/// Error returned by [`VariantStorage::set`](crate::VariantStorage::set)
///
/// `Store` carries the store's own error untouched.
#[derive(Debug, Error)]
pub enum SetError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Variant(#[from] VariantError),

    #[error(transparent)]
    Store(E),
}

impl<E: std::error::Error + 'static> SetError<E> {
    /// The store's native error, if that is what failed
    pub fn into_store_error(self) -> Option<E> {
        match self {
            Self::Store(e) => Some(e),
            Self::Variant(_) => None,
        }
    }

    pub fn is_variant(&self) -> bool {
        matches!(self, Self::Variant(_))
    }
}

/// Native error type of the stores shipped with this crate
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("Quota exceeded: storing '{key}' needs {required} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file corrupted: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Render at most `PREVIEW_LIMIT` characters of `value` for an error message
///
/// Rendering stops as soon as the limit is reached, so the cost is bounded
/// by the preview length rather than by the size of the value.
fn preview(value: impl std::fmt::Display) -> String {
    use std::fmt::Write;

    let mut out = BoundedWriter::new(PREVIEW_LIMIT);
    // An error here only means the limit was reached
    let _ = write!(out, "{}", value);
    if out.truncated {
        out.text.push_str("...");
    }
    out.text
}

/// `fmt::Write` sink that fails once it holds `remaining` characters
struct BoundedWriter {
    text: String,
    remaining: usize,
    truncated: bool,
}

impl BoundedWriter {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            remaining: limit,
            truncated: false,
        }
    }
}

impl std::fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        for c in s.chars() {
            if self.remaining == 0 {
                self.truncated = true;
                return Err(std::fmt::Error);
            }
            self.text.push(c);
            self.remaining -= 1;
        }
        Ok(())
    }
}
