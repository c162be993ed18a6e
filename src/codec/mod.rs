//! Codec Module
//!
//! Binary serialization of value graphs.
//!
//! ## Format (V1)
//! A payload is a single root node. Each node starts with a one-byte tag.
//! Lengths, counts and positions are LEB128 varints; signed integers are
//! zig-zag varints.
//!
//! ```text
//! ┌──────────┬─────────────────────────────────────────────┐
//! │ Tag (1)  │ Body (depends on tag)                       │
//! └──────────┴─────────────────────────────────────────────┘
//! ```
//!
//! ### Tags
//! - 0x00..0x03: undefined, null, false, true (no body)
//! - 0x04: FLOAT    - 8 bytes little-endian IEEE-754 (covers -0 and fractions)
//! - 0x05: INTEGER  - zig-zag varint, integral doubles in the safe range
//! - 0x06..0x08: NaN, +Infinity, -Infinity (no body)
//! - 0x09: BIGINT   - len + two's-complement little-endian bytes
//! - 0x0A: STRING   - len + UTF-8
//! - 0x0B: DATE     - zig-zag varint milliseconds
//! - 0x0C: PATTERN  - string body + flag bitmask (1)
//! - 0x10: ARRAY    - count + items, property count + (string, node) pairs
//! - 0x11: MAP      - count + (key node, value node) pairs
//! - 0x12: SET      - count + nodes
//! - 0x13: RECORD   - count + (key, node) pairs; key = 0x00 string | 0x01 zig-zag int
//! - 0x1F: REF      - varint position of an earlier composite
//!
//! ### Shared References
//! Composites are numbered in pre-order, starting at 0, the moment they are
//! first visited (before their children). Any later visit of the same
//! instance writes a REF to that position. The decoder replays the same
//! numbering, registering each composite before decoding its children, so
//! cycles resolve to the instance under construction.

mod decoder;
mod encoder;
mod varint;

use crate::config::{Config, DEFAULT_MAX_DEPTH};
use crate::error::Result;
use crate::value::Value;

use decoder::Decoder;
use encoder::Encoder;

/// Node tags
pub(crate) mod tag {
    pub const UNDEFINED: u8 = 0x00;
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const INTEGER: u8 = 0x05;
    pub const NAN: u8 = 0x06;
    pub const INFINITY: u8 = 0x07;
    pub const NEG_INFINITY: u8 = 0x08;
    pub const BIGINT: u8 = 0x09;
    pub const STRING: u8 = 0x0A;
    pub const DATE: u8 = 0x0B;
    pub const PATTERN: u8 = 0x0C;
    pub const ARRAY: u8 = 0x10;
    pub const MAP: u8 = 0x11;
    pub const SET: u8 = 0x12;
    pub const RECORD: u8 = 0x13;
    pub const REF: u8 = 0x1F;

    /// Record key kinds
    pub const KEY_TEXT: u8 = 0x00;
    pub const KEY_INT: u8 = 0x01;
}

/// Limits applied while encoding/decoding
#[derive(Debug, Clone, Copy)]
pub struct CodecOptions {
    /// Maximum composite nesting depth
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&Config> for CodecOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }
}

/// Serialize a value graph with default options
pub fn serialize(value: &Value) -> Result<Vec<u8>> {
    serialize_with(value, &CodecOptions::default())
}

/// Serialize a value graph
///
/// Fails with `CodecError::Encoding` if the graph holds a foreign value
/// anywhere or nests deeper than `options.max_depth`.
pub fn serialize_with(value: &Value, options: &CodecOptions) -> Result<Vec<u8>> {
    Encoder::new(options).finish(value)
}

/// Deserialize bytes with default options
pub fn deserialize(bytes: &[u8]) -> Result<Value> {
    deserialize_with(bytes, &CodecOptions::default())
}

/// Deserialize bytes into a value graph
///
/// Fails with `CodecError::Decoding` on malformed, truncated or trailing
/// input.
pub fn deserialize_with(bytes: &[u8], options: &CodecOptions) -> Result<Value> {
    Decoder::new(bytes, options).finish()
}
