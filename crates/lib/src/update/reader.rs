//! Cursor over lib0-encoded bytes.

use indexmap::IndexMap;

use super::errors::DecodeError;
use crate::item::Any;

const ANY_UNDEFINED: u8 = 127;
const ANY_NULL: u8 = 126;
const ANY_INTEGER: u8 = 125;
const ANY_FLOAT32: u8 = 124;
const ANY_FLOAT64: u8 = 123;
const ANY_BIGINT: u8 = 122;
const ANY_FALSE: u8 = 121;
const ANY_TRUE: u8 = 120;
const ANY_STRING: u8 = 119;
const ANY_MAP: u8 = 118;
const ANY_ARRAY: u8 = 117;
const ANY_BUFFER: u8 = 116;

/// Reads lib0 primitives from a byte slice.
///
/// Values borrowed from the buffer (strings, byte arrays) live as long as the
/// buffer, not the reader.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::UnexpectedEof { offset: self.pos });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Unsigned LEB128.
    pub fn read_var_u64(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift >= 64 || (shift == 63 && byte & 0x7f > 1) {
                return Err(DecodeError::VarIntOverflow { offset: start });
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    pub fn read_var_u32(&mut self) -> Result<u32, DecodeError> {
        let start = self.pos;
        let value = self.read_var_u64()?;
        u32::try_from(value).map_err(|_| DecodeError::VarIntOverflow { offset: start })
    }

    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let start = self.pos;
        let value = self.read_var_u64()?;
        usize::try_from(value).map_err(|_| DecodeError::VarIntOverflow { offset: start })
    }

    /// Signed varint: the first byte carries a sign bit and six value bits.
    pub fn read_var_i64(&mut self) -> Result<i64, DecodeError> {
        let start = self.pos;
        let overflow = || DecodeError::VarIntOverflow { offset: start };

        let mut byte = self.read_u8()?;
        let negative = byte & 0x40 != 0;
        let mut value = i64::from(byte & 0x3f);
        let mut mult: i64 = 64;
        while byte & 0x80 != 0 {
            byte = self.read_u8()?;
            let part = i64::from(byte & 0x7f).checked_mul(mult).ok_or_else(overflow)?;
            value = value.checked_add(part).ok_or_else(overflow)?;
            mult = mult.checked_mul(128).unwrap_or(i64::MAX);
        }
        Ok(if negative { -value } else { value })
    }

    /// Length-prefixed byte array.
    pub fn read_buf(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_len()?;
        self.read_exact(len)
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        let bytes = self.read_buf()?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset: start })
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let bytes = self.read_exact(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(f32::from_be_bytes(raw))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let bytes = self.read_exact(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_be_bytes(raw))
    }

    pub fn read_i64_be(&mut self) -> Result<i64, DecodeError> {
        let bytes = self.read_exact(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(raw))
    }

    /// Reads a value written by lib0's `writeAny`.
    pub fn read_any(&mut self) -> Result<Any, DecodeError> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        let value = match tag {
            ANY_UNDEFINED => Any::Undefined,
            ANY_NULL => Any::Null,
            ANY_INTEGER => Any::Integer(self.read_var_i64()?),
            ANY_FLOAT32 => Any::Float(f64::from(self.read_f32()?)),
            ANY_FLOAT64 => Any::Float(self.read_f64()?),
            ANY_BIGINT => Any::BigInt(self.read_i64_be()?),
            ANY_FALSE => Any::Bool(false),
            ANY_TRUE => Any::Bool(true),
            ANY_STRING => Any::String(self.read_string()?.to_owned()),
            ANY_MAP => {
                let len = self.read_len()?;
                let mut map = IndexMap::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    let key = self.read_string()?.to_owned();
                    let value = self.read_any()?;
                    map.insert(key, value);
                }
                Any::Map(map)
            }
            ANY_ARRAY => {
                let len = self.read_len()?;
                let mut values = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    values.push(self.read_any()?);
                }
                Any::Array(values)
            }
            ANY_BUFFER => Any::Buffer(self.read_buf()?.to_vec()),
            tag => return Err(DecodeError::UnknownAnyTag { tag, offset }),
        };
        Ok(value)
    }

    /// Reads a string holding JSON text. The literal `undefined` is accepted.
    pub fn read_json(&mut self) -> Result<Any, DecodeError> {
        let text = self.read_string()?;
        parse_json(text)
    }
}

pub(crate) fn parse_json(text: &str) -> Result<Any, DecodeError> {
    if text == "undefined" {
        return Ok(Any::Undefined);
    }
    serde_json::from_str::<serde_json::Value>(text)
        .map(Any::from)
        .map_err(|e| DecodeError::InvalidJson {
            reason: e.to_string(),
        })
}
