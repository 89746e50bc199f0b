//! BCFZ decoder (decompression).
//!
//! The stream is a sequence of tokens, each introduced by one control bit:
//!
//! ```text
//! 0 LL             literal run: LL (2 bits, reversed) raw bytes follow
//! 1 WWWW O.. S..   back-reference: W-bit offset and W-bit size, reversed
//! ```
//!
//! Decoding stops once the declared length is reached or the input runs
//! out. Running out is not an error; whatever was produced is returned.

use oxigpx_core::bitstream::BitReader;
use oxigpx_core::error::{GpxError, Result};
use oxigpx_core::events::{DecodeEvents, NoopEvents};

/// Bytes at the start of the decompressed stream that belong to the
/// container, not to the sector filesystem.
pub const SUB_HEADER_LEN: usize = 4;

/// Width of the word-size field of a back-reference. Unlike the other
/// fields it is read MSB-first, not reversed.
const WORD_SIZE_BITS: u8 = 4;

/// Width of the length field of a literal run.
const LITERAL_LEN_BITS: u8 = 2;

/// Upper bound on the up-front output reservation. The declared length
/// comes from the file, so it is only a hint.
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// BCFZ decoder for one compressed body.
#[derive(Debug, Clone, Copy)]
pub struct BcfzDecoder {
    /// Length declared in the container header.
    declared_len: usize,
}

impl BcfzDecoder {
    /// Create a decoder targeting `declared_len` output bytes.
    pub fn new(declared_len: usize) -> Self {
        Self { declared_len }
    }

    /// Length declared in the container header.
    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Decode the bit stream that follows the length field.
    ///
    /// The leading [`SUB_HEADER_LEN`] bytes are removed from the result
    /// unless the output is no longer than that.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Vec<u8> {
        self.decode_with(reader, &NoopEvents)
    }

    /// Like [`decode`](Self::decode), reporting progress to `events`.
    pub fn decode_with(&self, reader: &mut BitReader<'_>, events: &dyn DecodeEvents) -> Vec<u8> {
        let mut output = self.decode_raw(reader, events);
        if output.len() > SUB_HEADER_LEN {
            output.drain(..SUB_HEADER_LEN);
        }
        output
    }

    /// Decode without removing the sub-header.
    pub fn decode_raw(&self, reader: &mut BitReader<'_>, events: &dyn DecodeEvents) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.declared_len.min(MAX_PREALLOC));

        while output.len() < self.declared_len {
            if let Err(err) = Self::decode_token(reader, &mut output) {
                if let GpxError::EndOfStream { bit_position, .. } = err {
                    events.stream_exhausted(bit_position, output.len(), self.declared_len);
                }
                break;
            }
        }

        events.decompressed(output.len());
        output
    }

    /// Decode one literal run or back-reference into `output`.
    fn decode_token(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
        if reader.read_bit()? {
            let word_size = reader.read_bits(WORD_SIZE_BITS)? as u8;
            let offset = reader.read_bits_reversed(word_size) as usize;
            let size = reader.read_bits_reversed(word_size) as usize;
            copy_back_reference(output, offset, size);
        } else {
            let count = reader.read_bits_reversed(LITERAL_LEN_BITS);
            for _ in 0..count {
                // A short literal run ends decoding; bytes read so far stay.
                output.push(reader.read_byte()?);
            }
        }
        Ok(())
    }
}

/// Append `min(offset, size)` bytes copied from `offset` bytes back.
///
/// Bytes are copied one at a time from the growing buffer; a source index
/// past the current end yields a zero byte. A reference that starts before
/// the beginning of the output appends zeros instead of failing, which real
/// files depend on.
pub fn copy_back_reference(output: &mut Vec<u8>, offset: usize, size: usize) {
    let count = offset.min(size);

    let Some(start) = output.len().checked_sub(offset) else {
        output.resize(output.len() + count, 0);
        return;
    };

    output.reserve(count);
    for i in 0..count {
        let byte = output.get(start + i).copied().unwrap_or(0);
        output.push(byte);
    }
}
