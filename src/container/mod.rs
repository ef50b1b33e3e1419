//! Container codec: locate the JSON payload inside an asset file and write
//! edited payloads back with consistent length fields.
//!
//! # Layout
//! ```text
//! [0, 4096)              header (opaque, see `header.rs`)
//! [4096, 4100)           asset name length  (u32 LE)
//! [4100, 4100 + n)       asset name
//! pad to 4               json length        (u32 LE) at align4(4100 + n)
//! ..                     JSON object text, ends at the last '}' in the file
//! ```
//!
//! The payload end is never taken from the json-length field: game files
//! carry trailing NUL padding, so the decoder scans back for the final `}`.
//!
//! # Encoding
//! The asset name is not reconstructed.  [`encode`] writes the header, eight
//! zero bytes (empty name + json-length slot) and the JSON text, then patches
//! the file length (big-endian, offset 4), the object length (little-endian,
//! offset chosen by [`HeaderLayout`]) and the json length (little-endian).

use thiserror::Error;
use tracing::trace;

use crate::field::{read_u32_le, write_uint, Endian, FieldError, MAX_WIDTH};
use crate::header::{Header, HeaderLayout, FILE_LENGTH_OFFSET, HEADER_SIZE};

/// Marker present in every payload; used as a cheap format sniff.
pub const ITEM_TYPE_MARKER: &[u8] = b"\"ItemType\"";
/// Offset of the asset-name length field.
pub const ASSET_NAME_LENGTH_OFFSET: usize = HEADER_SIZE;
/// Reserved bytes written after the header on encode.
pub const RESERVED_LEN: usize = 8;

const JSON_LENGTH_BASE: usize = 4103;
const JSON_START_BASE: usize = 4107;

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    #[error("buffer of {len} bytes is too short for a container")]
    Truncated { len: usize },
    #[error("asset name length {asset_name_length} puts JSON start past end of {len}-byte buffer")]
    JsonStartOutOfBounds { asset_name_length: u32, len: usize },
    #[error("no closing brace found")]
    NoClosingBrace,
    #[error("JSON payload is empty (start {start}, last brace {end})")]
    EmptyPayload { start: usize, end: usize },
    #[error("JSON payload is not valid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("JSON payload is not a single object: {0}")]
    InvalidJson(String),
    #[error("header string at offset 20 is not NUL-terminated")]
    UnterminatedName,
    #[error("object-length field at offset {offset} does not fit in the header")]
    FieldOutsideHeader { offset: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("not an asset container (no \"ItemType\" marker)")]
    NotAContainer,
    #[error("malformed container: {0}")]
    Malformed(MalformedKind),
    #[error("container of {0} bytes exceeds 32-bit length fields")]
    Overflow(usize),
    #[error("unsupported format version tag: {0}")]
    UnsupportedVersion(u32),
    #[error("field error: {0}")]
    Field(#[from] FieldError),
}

impl ContainerError {
    /// True for the "skip this file" case.
    pub fn is_not_container(&self) -> bool {
        matches!(self, ContainerError::NotAContainer)
    }
}

impl From<MalformedKind> for ContainerError {
    fn from(kind: MalformedKind) -> Self {
        ContainerError::Malformed(kind)
    }
}

// ── Offsets ──────────────────────────────────────────────────────────────────

/// `(n + 3) mod 4`, computed without overflowing.
#[inline]
fn alignment_term(asset_name_length: usize) -> usize {
    (asset_name_length % 4 + 3) % 4
}

/// Offset of the json-length field for a given asset name length.
///
/// `4103 + n - (n + 3) mod 4`, which equals `align4(4100 + n)`.
pub fn json_length_offset(asset_name_length: usize) -> Option<usize> {
    JSON_LENGTH_BASE
        .checked_add(asset_name_length)
        .map(|v| v - alignment_term(asset_name_length))
}

/// Offset of the first JSON byte: `4107 + n - (n + 3) mod 4`.
pub fn json_start_offset(asset_name_length: usize) -> Option<usize> {
    JSON_START_BASE
        .checked_add(asset_name_length)
        .map(|v| v - alignment_term(asset_name_length))
}

// ── Decoded container ────────────────────────────────────────────────────────

/// A decoded container: the captured header plus the JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: Header,
    pub asset_name_length: u32,
    pub json: String,
}

impl Container {
    /// Re-encode with the asset name discarded.
    pub fn encode(&self, layout: HeaderLayout) -> Result<Vec<u8>, ContainerError> {
        encode(&self.header, &self.json, layout)
    }
}

// ── Decode ───────────────────────────────────────────────────────────────────

/// Whether `bytes` carries the `"ItemType"` marker anywhere.
pub fn is_container(bytes: &[u8]) -> bool {
    bytes
        .windows(ITEM_TYPE_MARKER.len())
        .any(|w| w == ITEM_TYPE_MARKER)
}

/// Decode a container, returning [`ContainerError::NotAContainer`] for
/// unrelated files.
pub fn decode(bytes: &[u8]) -> Result<Container, ContainerError> {
    if !is_container(bytes) {
        return Err(ContainerError::NotAContainer);
    }
    if bytes.len() < ASSET_NAME_LENGTH_OFFSET + MAX_WIDTH {
        return Err(MalformedKind::Truncated { len: bytes.len() }.into());
    }

    let asset_name_length = read_u32_le(bytes, ASSET_NAME_LENGTH_OFFSET)?;
    let start = usize::try_from(asset_name_length)
        .ok()
        .and_then(json_start_offset)
        .filter(|&start| start <= bytes.len())
        .ok_or(MalformedKind::JsonStartOutOfBounds { asset_name_length, len: bytes.len() })?;

    let end = bytes
        .iter()
        .rposition(|&b| b == b'}')
        .ok_or(MalformedKind::NoClosingBrace)?;
    if start > end {
        return Err(MalformedKind::EmptyPayload { start, end }.into());
    }

    let json = std::str::from_utf8(&bytes[start..=end])
        .map_err(|e| MalformedKind::InvalidUtf8(e.to_string()))?;
    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json)
        .map_err(|e| MalformedKind::InvalidJson(e.to_string()))?;

    trace!(asset_name_length, start, end, "decoded container");
    Ok(Container {
        header: Header::from_bytes(bytes)?,
        asset_name_length,
        json: json.to_owned(),
    })
}

/// Like [`decode`], but maps "not a container" to `Ok(None)`.
pub fn try_decode(bytes: &[u8]) -> Result<Option<Container>, ContainerError> {
    match decode(bytes) {
        Ok(c)                                  => Ok(Some(c)),
        Err(ContainerError::NotAContainer)     => Ok(None),
        Err(e)                                 => Err(e),
    }
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Build a container from `header` and `json`, patching all length fields.
pub fn encode(header: &Header, json: &str, layout: HeaderLayout) -> Result<Vec<u8>, ContainerError> {
    let object_length_offset = header.object_length_offset(layout)?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + RESERVED_LEN + json.len());
    buf.extend_from_slice(header.as_ref());
    buf.extend_from_slice(&[0u8; RESERVED_LEN]);
    buf.extend_from_slice(json.as_bytes());

    let file_length = u32::try_from(buf.len()).map_err(|_| ContainerError::Overflow(buf.len()))?;
    let object_length = file_length - HEADER_SIZE as u32;

    let asset_name_length = read_u32_le(&buf, ASSET_NAME_LENGTH_OFFSET)? as usize;
    let json_field = json_length_offset(asset_name_length).ok_or(ContainerError::Overflow(buf.len()))?;
    let json_length = buf
        .len()
        .checked_sub(json_field + MAX_WIDTH)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(ContainerError::Overflow(buf.len()))?;

    write_uint(&mut buf, FILE_LENGTH_OFFSET, file_length, Endian::Big, MAX_WIDTH)?;
    write_uint(&mut buf, object_length_offset, object_length, Endian::Little, MAX_WIDTH)?;
    write_uint(&mut buf, json_field, json_length, Endian::Little, MAX_WIDTH)?;

    trace!(file_length, object_length, json_length, object_length_offset, "encoded container");
    Ok(buf)
}
