//! # OxiGPX-BCFZ: Pure Rust BCFZ Decompression
//!
//! This crate decompresses the body of a `BCFZ` container, the compressed
//! variant of the Guitar Pro 6 file format.
//!
//! ## Stream Layout
//!
//! After the 4-byte `BCFZ` magic comes a little-endian `u32` with the
//! decompressed length, then an MSB-first bit stream of tokens:
//!
//! - **Literal run** (`0`): a 2-bit length `L` read in reversed bit order,
//!   followed by `L` bytes.
//! - **Back-reference** (`1`): a 4-bit word size `W`, then a `W`-bit offset
//!   and a `W`-bit size, both in reversed bit order. `min(offset, size)`
//!   bytes are copied from `offset` bytes back.
//!
//! The first four decompressed bytes are a sub-header and are dropped.
//!
//! ## Compatibility Quirks
//!
//! - A back-reference reaching before the start of the output produces
//!   zero bytes instead of an error.
//! - Truncated input ends decoding quietly with a partial result.
//! - The last token may push the output past the declared length; the
//!   excess is kept.
//!
//! ## Example
//!
//! ```rust
//! use oxigpx_bcfz::decompress;
//! use oxigpx_core::{BitReader, BitWriter, NoopEvents};
//!
//! // Declared length 6, then literal "BCF", literal "Sab".
//! let mut stream = BitWriter::new();
//! stream.write_bytes(&6u32.to_le_bytes());
//! for run in [b"BCF", b"Sab"] {
//!     stream.write_bit(false);
//!     stream.write_bits_reversed(3, 2);
//!     stream.write_bytes(run);
//! }
//! let body = stream.into_vec();
//!
//! let mut reader = BitReader::new(&body);
//! let output = decompress(&mut reader, &NoopEvents).unwrap();
//! assert_eq!(output, b"ab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod decoder;

pub use decoder::{BcfzDecoder, SUB_HEADER_LEN, copy_back_reference};

use oxigpx_core::bitstream::BitReader;
use oxigpx_core::error::{GpxError, Result};
use oxigpx_core::events::DecodeEvents;

/// Size of the declared-length field that precedes the bit stream.
pub const LENGTH_FIELD_LEN: usize = 4;

/// Read the declared length and decompress the rest of a BCFZ body.
///
/// `reader` must sit just past the `BCFZ` magic. Fails only if the length
/// field itself is cut short; an exhausted bit stream yields the bytes
/// decoded so far.
pub fn decompress(reader: &mut BitReader<'_>, events: &dyn DecodeEvents) -> Result<Vec<u8>> {
    let declared_len = read_declared_len(reader)?;
    events.compressed_body(declared_len);
    Ok(BcfzDecoder::new(declared_len).decode_with(reader, events))
}

/// Decompress a BCFZ body held in a slice (everything after the magic).
pub fn decompress_body(body: &[u8], events: &dyn DecodeEvents) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(body);
    decompress(&mut reader, events)
}

fn read_declared_len(reader: &mut BitReader<'_>) -> Result<usize> {
    let available = reader.remaining_len();
    match reader.read_u32_le() {
        Ok(len) => Ok(len as usize),
        Err(GpxError::EndOfStream { .. }) => Err(GpxError::truncated_header(
            "decompressed length",
            LENGTH_FIELD_LEN,
            available,
        )),
        Err(e) => Err(e),
    }
}
