//! The 4096-byte container header and its two field layouts.
//!
//! The header is carried opaquely.  Only three things are ever read from it:
//!
//! | Offset | Size | Endian | Meaning                                   |
//! |--------|------|--------|-------------------------------------------|
//! | 4      | 4    | big    | total file length (patched on encode)     |
//! | 8      | 4    | little | format-version tag                        |
//! | 20     | ..   | n/a    | NUL-terminated string (legacy layout)     |
//!
//! The object-length field lives at an offset that depends on the format
//! revision, see [`HeaderLayout`].

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::container::{ContainerError, MalformedKind};

pub const HEADER_SIZE: usize = 4096;
pub const FILE_LENGTH_OFFSET: usize = 4;
pub const VERSION_TAG_OFFSET: usize = 8;
pub const NAME_STRING_OFFSET: usize = 20;

/// Version tag → object-length offset, for [`HeaderLayout::VersionTable`].
pub const VERSION_TABLE: &[(u32, usize)] = &[(15, 76), (17, 80)];

/// Constant term of the legacy name-length derivation.
const NAME_LENGTH_BASE: usize = 67;

/// How the object-length field offset is derived from a header.
///
/// Two format revisions exist on disk and their headers cannot be told apart
/// reliably, so the caller chooses.  Files written by older game builds need
/// [`HeaderLayout::NameLength`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HeaderLayout {
    /// Fixed offset keyed by the version tag at offset 8.
    #[default]
    VersionTable,
    /// `align4(67 + strlen(header[20..]))`.
    NameLength,
}

impl HeaderLayout {
    pub fn name(self) -> &'static str {
        match self {
            HeaderLayout::VersionTable => "version-table",
            HeaderLayout::NameLength   => "name-length",
        }
    }
}

impl fmt::Display for HeaderLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Round `n` up to a multiple of 4.
#[inline]
pub fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// Owned copy of a container's first [`HEADER_SIZE`] bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    bytes: Box<[u8; HEADER_SIZE]>,
}

impl Header {
    /// Capture the header from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        let head: [u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|h| h.try_into().ok())
            .ok_or(ContainerError::Malformed(MalformedKind::Truncated { len: bytes.len() }))?;
        Ok(Self { bytes: Box::new(head) })
    }

    pub fn from_array(bytes: [u8; HEADER_SIZE]) -> Self {
        Self { bytes: Box::new(bytes) }
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.bytes
    }

    pub fn format_version(&self) -> u32 {
        let b = &self.bytes[VERSION_TAG_OFFSET..VERSION_TAG_OFFSET + 4];
        LittleEndian::read_u32(b)
    }

    /// Length of the NUL-terminated string at offset 20, if it terminates
    /// inside the header.
    pub fn name_string_len(&self) -> Option<usize> {
        self.bytes[NAME_STRING_OFFSET..].iter().position(|&b| b == 0)
    }

    /// Offset of the little-endian object-length field under `layout`.
    pub fn object_length_offset(&self, layout: HeaderLayout) -> Result<usize, ContainerError> {
        let offset = match layout {
            HeaderLayout::VersionTable => {
                let tag = self.format_version();
                VERSION_TABLE
                    .iter()
                    .find(|(t, _)| *t == tag)
                    .map(|(_, off)| *off)
                    .ok_or(ContainerError::UnsupportedVersion(tag))?
            }
            HeaderLayout::NameLength => {
                let len = self
                    .name_string_len()
                    .ok_or(ContainerError::Malformed(MalformedKind::UnterminatedName))?;
                align4(NAME_LENGTH_BASE + len)
            }
        };
        if offset + 4 > HEADER_SIZE {
            return Err(ContainerError::Malformed(MalformedKind::FieldOutsideHeader { offset }));
        }
        Ok(offset)
    }
}

impl AsRef<[u8]> for Header {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("format_version", &self.format_version())
            .field("prefix", &hex::encode(&self.bytes[..32]))
            .finish()
    }
}
