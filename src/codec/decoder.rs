//! Decoder
//!
//! Rebuilds a value graph, replaying the encoder's pre-order numbering.

use bytes::Buf;
use num_bigint::BigInt;

use crate::error::{CodecError, Result};
use crate::value::{
    Array, Date, Key, Map, Pattern, PatternFlags, Record, Set, Value, MAX_SAFE_INTEGER,
};

use super::varint::{get_varint, unzigzag};
use super::{tag, CodecOptions};

/// Reads one value graph; lives for a single `deserialize` call
pub(super) struct Decoder<'a, 'o> {
    input: &'a [u8],
    /// Pre-order position -> reconstructed composite
    nodes: Vec<Value>,
    options: &'o CodecOptions,
    depth: usize,
}

impl<'a, 'o> Decoder<'a, 'o> {
    pub(super) fn new(input: &'a [u8], options: &'o CodecOptions) -> Self {
        Self {
            input,
            nodes: Vec::new(),
            options,
            depth: 0,
        }
    }

    pub(super) fn finish(mut self) -> Result<Value> {
        let total = self.input.len();
        let value = self.decode()?;
        if self.input.has_remaining() {
            return Err(CodecError::Decoding(format!(
                "{} trailing bytes after value",
                self.input.remaining()
            )));
        }
        tracing::trace!(bytes = total, composites = self.nodes.len(), "decoded value graph");
        Ok(value)
    }

    /// Recursive entry point; composites recurse through here, everything
    /// else is handled out of line to keep each nesting level's frame small
    fn decode(&mut self) -> Result<Value> {
        let node = self.read_u8()?;
        match node {
            tag::ARRAY => self.decode_array(),
            tag::MAP => self.decode_map(),
            tag::SET => self.decode_set(),
            tag::RECORD => self.decode_record(),
            tag::REF => self.decode_ref(),
            _ => self.decode_scalar(node),
        }
    }

    #[inline(never)]
    fn decode_scalar(&mut self, node: u8) -> Result<Value> {
        let value = match node {
            tag::UNDEFINED => Value::Undefined,
            tag::NULL => Value::Null,
            tag::FALSE => Value::Bool(false),
            tag::TRUE => Value::Bool(true),
            tag::FLOAT => {
                self.ensure(8, "float")?;
                Value::Number(self.input.get_f64_le())
            }
            tag::INTEGER => {
                let n = unzigzag(get_varint(&mut self.input)?) as f64;
                if n.abs() > MAX_SAFE_INTEGER {
                    return Err(CodecError::Decoding(format!(
                        "integer {} outside the safe range",
                        n
                    )));
                }
                Value::Number(n)
            }
            tag::NAN => Value::Number(f64::NAN),
            tag::INFINITY => Value::Number(f64::INFINITY),
            tag::NEG_INFINITY => Value::Number(f64::NEG_INFINITY),
            tag::BIGINT => Value::BigInt(BigInt::from_signed_bytes_le(self.read_bytes()?)),
            tag::STRING => Value::String(self.read_string()?),
            tag::DATE => {
                let millis = unzigzag(get_varint(&mut self.input)?);
                let date = Date::from_millis(millis).ok_or_else(|| {
                    CodecError::Decoding(format!("date {} ms outside the valid range", millis))
                })?;
                Value::Date(date)
            }
            tag::PATTERN => {
                let source = self.read_string()?;
                let bits = self.read_u8()?;
                let flags = PatternFlags::from_bits(bits).ok_or_else(|| {
                    CodecError::Decoding(format!("invalid pattern flags 0x{:02x}", bits))
                })?;
                Value::Pattern(Pattern::with_flags(source, flags))
            }
            _ => {
                return Err(CodecError::Decoding(format!(
                    "unknown type tag: 0x{:02x}",
                    node
                )))
            }
        };
        Ok(value)
    }

    #[inline(never)]
    fn decode_ref(&mut self) -> Result<Value> {
        let position = get_varint(&mut self.input)?;
        usize::try_from(position)
            .ok()
            .and_then(|p| self.nodes.get(p))
            .cloned()
            .ok_or_else(|| {
                CodecError::Decoding(format!(
                    "reference to unknown position {} ({} known)",
                    position,
                    self.nodes.len()
                ))
            })
    }

    // =========================================================================
    // Composites
    //
    // Each composite is registered in `nodes` before its children are read,
    // so a child REF can point at it while it is still being filled.
    // =========================================================================

    #[inline(never)]
    fn decode_array(&mut self) -> Result<Value> {
        self.enter()?;
        let array = Array::new();
        self.register(Value::Array(array.clone()));

        let count = self.read_count()?;
        array.borrow_mut().items.reserve(count);
        for _ in 0..count {
            let item = self.decode()?;
            array.borrow_mut().items.push(item);
        }

        let properties = self.read_count()?;
        for _ in 0..properties {
            let name = self.read_string()?;
            let item = self.decode()?;
            array.set_property(name, item);
        }

        self.leave();
        Ok(Value::Array(array))
    }

    #[inline(never)]
    fn decode_map(&mut self) -> Result<Value> {
        self.enter()?;
        let map = Map::new();
        self.register(Value::Map(map.clone()));

        let count = self.read_count()?;
        for _ in 0..count {
            let key = self.decode()?;
            let item = self.decode()?;
            map.insert(key, item);
        }

        self.leave();
        Ok(Value::Map(map))
    }

    #[inline(never)]
    fn decode_set(&mut self) -> Result<Value> {
        self.enter()?;
        let set = Set::new();
        self.register(Value::Set(set.clone()));

        let count = self.read_count()?;
        for _ in 0..count {
            let item = self.decode()?;
            set.insert(item);
        }

        self.leave();
        Ok(Value::Set(set))
    }

    #[inline(never)]
    fn decode_record(&mut self) -> Result<Value> {
        self.enter()?;
        let record = Record::new();
        self.register(Value::Record(record.clone()));

        let count = self.read_count()?;
        for _ in 0..count {
            let key = self.read_key()?;
            let item = self.decode()?;
            record.insert(key, item);
        }

        self.leave();
        Ok(Value::Record(record))
    }

    #[inline(never)]
    fn read_key(&mut self) -> Result<Key> {
        match self.read_u8()? {
            tag::KEY_TEXT => Ok(Key::Text(self.read_string()?)),
            tag::KEY_INT => Ok(Key::Int(unzigzag(get_varint(&mut self.input)?))),
            other => Err(CodecError::Decoding(format!(
                "unknown record key kind: 0x{:02x}",
                other
            ))),
        }
    }

    fn register(&mut self, node: Value) {
        self.nodes.push(node);
    }

    // =========================================================================
    // Primitive readers
    // =========================================================================

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        if self.input.remaining() < needed {
            return Err(CodecError::Decoding(format!(
                "truncated {}: expected {} bytes, got {}",
                what,
                needed,
                self.input.remaining()
            )));
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1, "node")?;
        Ok(self.input.get_u8())
    }

    /// Element count; every element takes at least one byte, so a count
    /// larger than the remaining input is malformed
    #[inline(never)]
    fn read_count(&mut self) -> Result<usize> {
        let count = get_varint(&mut self.input)?;
        match usize::try_from(count) {
            Ok(count) if count <= self.input.remaining() => Ok(count),
            _ => Err(CodecError::Decoding(format!(
                "count {} exceeds remaining {} bytes",
                count,
                self.input.remaining()
            ))),
        }
    }

    fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = get_varint(&mut self.input)?;
        let len = usize::try_from(len)
            .map_err(|_| CodecError::Decoding(format!("length {} too large", len)))?;
        self.ensure(len, "byte string")?;
        let input: &'a [u8] = self.input;
        let (head, tail) = input.split_at(len);
        self.input = tail;
        Ok(head)
    }

    #[inline(never)]
    fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| CodecError::Decoding(format!("invalid UTF-8 in string: {}", e)))
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

#[cold]
#[inline(never)]
fn too_deep(max_depth: usize) -> CodecError {
    CodecError::Decoding(format!("payload nests deeper than {} levels", max_depth))
}
