//! Varint helpers
//!
//! LEB128 for unsigned values, zig-zag mapping for signed ones.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CodecError, Result};

/// Maximum encoded size of a u64
pub(super) const MAX_VARINT_LEN: usize = 10;

pub(super) fn put_varint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(super) fn get_varint(buf: &mut &[u8]) -> Result<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(CodecError::Decoding("truncated varint".to_string()));
        }
        let byte = buf.get_u8();
        // The tenth byte may only carry the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(CodecError::Decoding("varint overflows 64 bits".to_string()));
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::Decoding("varint overflows 64 bits".to_string()))
}

pub(super) fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub(super) fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
