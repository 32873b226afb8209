//! Little-endian CDR read cursor.

use bytes::Buf;
use mcap2json_core::Value;

use crate::{error::CdrError, types::PrimitiveType};

/// Size of the encapsulation header at the start of every top-level payload.
pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// Read position over a byte buffer.
///
/// The offset only moves forward. Alignment is absolute within `data`: the
/// encapsulation header counts towards a top-level offset, and a nested record
/// aligns from the start of its own slice.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor for a top-level message, positioned past the encapsulation header.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: ENCAPSULATION_HEADER_SIZE,
        }
    }

    /// Cursor for a nested record that starts at the beginning of `data`.
    pub fn nested(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Bytes from the current offset to the end (empty once exhausted).
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.offset..).unwrap_or_default()
    }

    pub fn advance(&mut self, n: usize) {
        self.offset += n;
    }

    /// Round the offset up to a multiple of `n` (a power of two).
    pub fn align(&mut self, n: usize) {
        debug_assert!(n.is_power_of_two());
        self.offset = (self.offset + n - 1) & !(n - 1);
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CdrError> {
        let remaining = self.remaining();
        if remaining.len() < n {
            return Err(CdrError::UnexpectedEof {
                offset: self.offset,
                needed: n,
                remaining: remaining.len(),
            });
        }
        self.offset += n;
        Ok(&remaining[..n])
    }

    /// Align to the primitive's requirement, then read it.
    pub fn read_primitive(&mut self, p: PrimitiveType) -> Result<Value, CdrError> {
        self.align(p.align());
        let mut b = self.take(p.size())?;
        Ok(match p {
            PrimitiveType::U8 => Value::UInt(b.get_u8().into()),
            PrimitiveType::I8 => Value::Int(b.get_i8().into()),
            PrimitiveType::U16 => Value::UInt(b.get_u16_le().into()),
            PrimitiveType::I16 => Value::Int(b.get_i16_le().into()),
            PrimitiveType::U32 => Value::UInt(b.get_u32_le().into()),
            PrimitiveType::I32 => Value::Int(b.get_i32_le().into()),
            PrimitiveType::U64 => Value::UInt(b.get_u64_le()),
            PrimitiveType::I64 => Value::Int(b.get_i64_le()),
            PrimitiveType::F32 => Value::Float(b.get_f32_le().into()),
            PrimitiveType::F64 => Value::Float(b.get_f64_le()),
            PrimitiveType::Bool => Value::Bool(b.get_u8() != 0),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32, CdrError> {
        self.align(4);
        Ok(self.take(4)?.get_u32_le())
    }

    pub fn read_i32(&mut self) -> Result<i32, CdrError> {
        self.align(4);
        Ok(self.take(4)?.get_i32_le())
    }

    /// Read a 4-byte-aligned, `u32` length-prefixed string.
    ///
    /// The prefix is authoritative. A single trailing NUL inside the counted
    /// bytes is dropped; invalid UTF-8 is replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String, CdrError> {
        let len = self.read_u32()? as usize;
        let remaining = self.remaining().len();
        if len > remaining {
            return Err(CdrError::LengthOverflow {
                offset: self.offset,
                len,
                remaining,
            });
        }
        let bytes = self.take(len)?;
        let text = bytes.strip_suffix(b"\0").unwrap_or(bytes);
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_counts_the_header_and_restarts_in_nested_slices() {
        let data = [0u8; 32];
        let mut top = Cursor::new(&data);
        top.align(8);
        assert_eq!(top.offset(), 8);
        top.advance(1);
        top.align(8);
        assert_eq!(top.offset(), 16);

        let mut nested = Cursor::nested(&data[6..]);
        nested.advance(1);
        nested.align(4);
        assert_eq!(nested.offset(), 4);
    }

    #[test]
    fn align_on_boundary_is_a_no_op() {
        let data = [0u8; 16];
        let mut cursor = Cursor::new(&data);
        cursor.align(4);
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn take_past_end_reports_offset_and_shortfall() {
        let data = [0u8, 1, 0, 0, 9, 9];
        let mut cursor = Cursor::new(&data);
        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            CdrError::UnexpectedEof {
                offset: 4,
                needed: 4,
                remaining: 2
            }
        );
    }
}
