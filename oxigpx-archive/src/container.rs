//! Container format detection.
//!
//! A GPX file starts with a 4-byte magic that selects how the sector
//! filesystem image is stored:
//!
//! - `BCFZ`: a length-prefixed BCFZ bit stream
//! - `BCFS`: the image itself, uncompressed

use oxigpx_core::bitstream::BitReader;
use oxigpx_core::error::{GpxError, Result};
use oxigpx_core::events::DecodeEvents;
use std::borrow::Cow;

/// Length of the container magic.
pub const MAGIC_LEN: usize = 4;

/// Known container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// BCFZ-compressed image.
    Compressed,
    /// Uncompressed BCFS image.
    Stored,
}

impl ContainerFormat {
    /// Detect format from magic bytes.
    pub fn from_magic(magic: &[u8; MAGIC_LEN]) -> Option<Self> {
        match magic {
            b"BCFZ" => Some(Self::Compressed),
            b"BCFS" => Some(Self::Stored),
            _ => None,
        }
    }

    /// The magic bytes of this format.
    pub fn magic(&self) -> &'static [u8; MAGIC_LEN] {
        match self {
            Self::Compressed => b"BCFZ",
            Self::Stored => b"BCFS",
        }
    }

    /// Check if the image has to be decompressed.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed)
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compressed => write!(f, "BCFZ"),
            Self::Stored => write!(f, "BCFS"),
        }
    }
}

/// Read the magic and return the sector filesystem image.
///
/// A stored image is borrowed from `data`; a compressed one is decoded
/// into a new buffer.
pub fn open_container<'a>(
    data: &'a [u8],
    events: &dyn DecodeEvents,
) -> Result<(ContainerFormat, Cow<'a, [u8]>)> {
    let mut reader = BitReader::new(data);
    let magic: [u8; MAGIC_LEN] = match reader.read_bytes(MAGIC_LEN) {
        Ok(bytes) => [bytes[0], bytes[1], bytes[2], bytes[3]],
        Err(GpxError::EndOfStream { .. }) => {
            return Err(GpxError::truncated_header("magic", MAGIC_LEN, data.len()));
        }
        Err(e) => return Err(e),
    };
    events.container_header(&magic);

    let format =
        ContainerFormat::from_magic(&magic).ok_or_else(|| GpxError::unsupported_format(magic))?;
    let image = match format {
        ContainerFormat::Compressed => Cow::Owned(oxigpx_bcfz::decompress(&mut reader, events)?),
        ContainerFormat::Stored => Cow::Borrowed(reader.read_remaining()),
    };

    Ok((format, image))
}
