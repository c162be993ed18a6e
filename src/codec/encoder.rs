//! Encoder
//!
//! Depth-first, pre-order walk of a value graph.

use std::collections::HashMap;

use bytes::{BufMut, BytesMut};

use crate::error::{CodecError, Result};
use crate::value::{Foreign, Key, Value, MAX_SAFE_INTEGER};

use super::varint::{put_varint, zigzag};
use super::{tag, CodecOptions};

/// Writes one value graph; lives for a single `serialize` call
pub(super) struct Encoder<'o> {
    buf: BytesMut,
    /// Composite identity -> pre-order position
    positions: HashMap<usize, u64>,
    options: &'o CodecOptions,
    depth: usize,
}

impl<'o> Encoder<'o> {
    pub(super) fn new(options: &'o CodecOptions) -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
            positions: HashMap::new(),
            options,
            depth: 0,
        }
    }

    pub(super) fn finish(mut self, value: &Value) -> Result<Vec<u8>> {
        self.encode(value)?;
        tracing::trace!(
            bytes = self.buf.len(),
            composites = self.positions.len(),
            "encoded value graph"
        );
        Ok(self.buf.to_vec())
    }

    fn encode(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Undefined => self.buf.put_u8(tag::UNDEFINED),
            Value::Null => self.buf.put_u8(tag::NULL),
            Value::Bool(false) => self.buf.put_u8(tag::FALSE),
            Value::Bool(true) => self.buf.put_u8(tag::TRUE),
            Value::Number(n) => self.encode_number(*n),
            Value::BigInt(b) => {
                self.buf.put_u8(tag::BIGINT);
                self.put_bytes(&b.to_signed_bytes_le());
            }
            Value::String(s) => {
                self.buf.put_u8(tag::STRING);
                self.put_bytes(s.as_bytes());
            }
            Value::Date(d) => {
                self.buf.put_u8(tag::DATE);
                put_varint(&mut self.buf, zigzag(d.millis()));
            }
            Value::Pattern(p) => {
                self.buf.put_u8(tag::PATTERN);
                self.put_bytes(p.source().as_bytes());
                self.buf.put_u8(p.flags().bits());
            }
            Value::Array(array) => {
                if self.back_reference(array.node_id()) {
                    return Ok(());
                }
                self.enter()?;
                self.buf.put_u8(tag::ARRAY);
                let data = array.borrow();
                put_varint(&mut self.buf, data.items.len() as u64);
                for item in &data.items {
                    self.encode(item)?;
                }
                put_varint(&mut self.buf, data.properties.len() as u64);
                for (name, item) in &data.properties {
                    self.put_bytes(name.as_bytes());
                    self.encode(item)?;
                }
                self.leave();
            }
            Value::Map(map) => {
                if self.back_reference(map.node_id()) {
                    return Ok(());
                }
                self.enter()?;
                self.buf.put_u8(tag::MAP);
                let entries = map.borrow();
                put_varint(&mut self.buf, entries.len() as u64);
                for (key, item) in entries.iter() {
                    self.encode(key)?;
                    self.encode(item)?;
                }
                self.leave();
            }
            Value::Set(set) => {
                if self.back_reference(set.node_id()) {
                    return Ok(());
                }
                self.enter()?;
                self.buf.put_u8(tag::SET);
                let values = set.borrow();
                put_varint(&mut self.buf, values.len() as u64);
                for item in values.iter() {
                    self.encode(item)?;
                }
                self.leave();
            }
            Value::Record(record) => {
                if self.back_reference(record.node_id()) {
                    return Ok(());
                }
                self.enter()?;
                self.buf.put_u8(tag::RECORD);
                let fields = record.borrow();
                put_varint(&mut self.buf, fields.len() as u64);
                for (key, item) in fields.iter() {
                    match key {
                        Key::Text(name) => {
                            self.buf.put_u8(tag::KEY_TEXT);
                            self.put_bytes(name.as_bytes());
                        }
                        Key::Int(i) => {
                            self.buf.put_u8(tag::KEY_INT);
                            put_varint(&mut self.buf, zigzag(*i));
                        }
                    }
                    self.encode(item)?;
                }
                self.leave();
            }
            Value::Foreign(foreign) => return Err(unsupported(foreign)),
        }
        Ok(())
    }

    /// Pick the narrowest tag that reproduces `n` exactly
    fn encode_number(&mut self, n: f64) {
        if n.is_nan() {
            self.buf.put_u8(tag::NAN);
        } else if n == f64::INFINITY {
            self.buf.put_u8(tag::INFINITY);
        } else if n == f64::NEG_INFINITY {
            self.buf.put_u8(tag::NEG_INFINITY);
        } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER && !is_negative_zero(n) {
            self.buf.put_u8(tag::INTEGER);
            put_varint(&mut self.buf, zigzag(n as i64));
        } else {
            self.buf.put_u8(tag::FLOAT);
            self.buf.put_f64_le(n);
        }
    }

    /// Length-prefixed byte string
    fn put_bytes(&mut self, bytes: &[u8]) {
        put_varint(&mut self.buf, bytes.len() as u64);
        self.buf.put_slice(bytes);
    }

    /// Write a REF if this instance was seen before, otherwise assign it the
    /// next position and return false
    fn back_reference(&mut self, id: usize) -> bool {
        if let Some(&position) = self.positions.get(&id) {
            self.buf.put_u8(tag::REF);
            put_varint(&mut self.buf, position);
            return true;
        }
        let position = self.positions.len() as u64;
        self.positions.insert(id, position);
        false
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(too_deep(self.options.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

fn is_negative_zero(n: f64) -> bool {
    n == 0.0 && n.is_sign_negative()
}

#[cold]
#[inline(never)]
fn too_deep(max_depth: usize) -> CodecError {
    CodecError::Encoding(format!("value nests deeper than {} levels", max_depth))
}

#[cold]
#[inline(never)]
fn unsupported(foreign: &Foreign) -> CodecError {
    CodecError::Encoding(format!("unsupported value {}", foreign))
}
