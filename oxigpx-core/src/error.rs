//! Error types for OxiGPX operations.
//!
//! Only two conditions abort a decode: a container whose magic cannot be read
//! and a container whose magic is not recognized. Running out of input inside
//! the compressed stream is reported as [`GpxError::EndOfStream`] by the bit
//! reader, but the decompressor absorbs it and returns what it produced.

use std::io;
use thiserror::Error;

/// The main error type for OxiGPX operations.
#[derive(Debug, Error)]
pub enum GpxError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bit stream ran out of input.
    #[error("Unexpected end of stream at bit position {bit_position}")]
    EndOfStream {
        /// Bit position where input was exhausted.
        bit_position: u64,
        /// Bits accumulated by the failing read before input ran out.
        partial: u32,
    },

    /// The container header (magic or declared length) could not be read.
    #[error("Truncated container header: {field} needs {needed} bytes, {available} available")]
    TruncatedHeader {
        /// Header field that could not be read.
        field: &'static str,
        /// Number of bytes the field needs.
        needed: usize,
        /// Number of bytes that were left.
        available: usize,
    },

    /// Container magic is neither `BCFZ` nor `BCFS`.
    #[error("Unsupported format header: {}", String::from_utf8_lossy(found))]
    UnsupportedFormat {
        /// The four bytes found at the start of the container.
        found: [u8; 4],
    },

    /// None of the recognized score files were present in the container.
    #[error("No valid content files found in GPX (expected one of: {expected})")]
    NoContent {
        /// Comma-separated list of the accepted file names.
        expected: String,
    },

    /// A value does not fit the fields of a classic (non-Zip64) archive.
    #[error("ZIP limit exceeded: {field} is {value}")]
    ZipLimit {
        /// Field that overflowed.
        field: &'static str,
        /// Value that did not fit.
        value: u64,
    },
}

/// Result type alias for OxiGPX operations.
pub type Result<T> = std::result::Result<T, GpxError>;

impl GpxError {
    /// Create an end-of-stream error.
    pub fn end_of_stream(bit_position: u64, partial: u32) -> Self {
        Self::EndOfStream {
            bit_position,
            partial,
        }
    }

    /// Create a truncated header error.
    pub fn truncated_header(field: &'static str, needed: usize, available: usize) -> Self {
        Self::TruncatedHeader {
            field,
            needed,
            available,
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(found: [u8; 4]) -> Self {
        Self::UnsupportedFormat { found }
    }

    /// Create a no-content error listing the accepted names.
    pub fn no_content<S: AsRef<str>>(expected: &[S]) -> Self {
        Self::NoContent {
            expected: expected
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a ZIP limit error.
    pub fn zip_limit(field: &'static str, value: u64) -> Self {
        Self::ZipLimit { field, value }
    }

    /// Check whether this error is an exhausted bit stream.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream { .. })
    }
}
