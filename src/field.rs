//! Fixed-width integer fields inside a byte buffer.
//!
//! Container length fields are mixed-endian: the file length is stored
//! big-endian while every other field is little-endian.  Callers name the
//! byte order explicitly on every access so the asymmetry stays visible.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use thiserror::Error;

/// Widest field supported, in bytes.
pub const MAX_WIDTH: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("field of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds { offset: usize, width: usize, len: usize },
    #[error("unsupported field width: {0}")]
    InvalidWidth(usize),
    #[error("value {value} does not fit in {width} bytes")]
    ValueTooWide { value: u32, width: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

fn field_range(len: usize, offset: usize, width: usize) -> Result<std::ops::Range<usize>, FieldError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(FieldError::InvalidWidth(width));
    }
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(FieldError::OutOfBounds { offset, width, len }),
    }
}

/// Read an unsigned integer of `width` bytes at `offset`.
pub fn read_uint(buf: &[u8], offset: usize, endian: Endian, width: usize) -> Result<u32, FieldError> {
    let range = field_range(buf.len(), offset, width)?;
    let bytes = &buf[range];
    let value = match endian {
        Endian::Little => LittleEndian::read_uint(bytes, width),
        Endian::Big    => BigEndian::read_uint(bytes, width),
    };
    // width <= 4, so the value always fits.
    Ok(value as u32)
}

/// Write `value` as an unsigned integer of `width` bytes at `offset`.
pub fn write_uint(buf: &mut [u8], offset: usize, value: u32, endian: Endian, width: usize) -> Result<(), FieldError> {
    let range = field_range(buf.len(), offset, width)?;
    if width < MAX_WIDTH && u64::from(value) >> (8 * width) != 0 {
        return Err(FieldError::ValueTooWide { value, width });
    }
    let bytes = &mut buf[range];
    match endian {
        Endian::Little => LittleEndian::write_uint(bytes, u64::from(value), width),
        Endian::Big    => BigEndian::write_uint(bytes, u64::from(value), width),
    }
    Ok(())
}

#[inline]
pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32, FieldError> {
    read_uint(buf, offset, Endian::Little, MAX_WIDTH)
}

#[inline]
pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, FieldError> {
    read_uint(buf, offset, Endian::Big, MAX_WIDTH)
}
