//! Bit-level I/O for the BCFZ container.
//!
//! This module provides `BitReader` and `BitWriter` over in-memory buffers.
//! Unlike DEFLATE or LZH, BCFZ packs bits MSB-first: the first bit of a
//! byte is its most significant bit.
//!
//! Multi-bit fields come in two orders:
//!
//! - [`BitReader::read_bits`] places the first bit read in the most
//!   significant position of the result (`value = value << 1 | bit`).
//! - [`BitReader::read_bits_reversed`] places the first bit read in the least
//!   significant position (`value |= bit << i`). BCFZ uses this for
//!   back-reference offsets and sizes and for literal run lengths.
//!
//! # Example
//!
//! ```
//! use oxigpx_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits_reversed(0b0011, 4);
//! let data = writer.into_vec();
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits_reversed(4), 0b0011);
//! ```

use crate::error::{GpxError, Result};

/// MSB-first bit reader over a borrowed byte slice.
///
/// The cursor only moves forward. Every read either advances it or fails
/// with [`GpxError::EndOfStream`] once the slice is exhausted.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Index of the byte holding the next bit.
    byte_pos: usize,
    /// Offset of the next bit inside `data[byte_pos]`, 0 = MSB.
    bit_offset: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_offset: 0,
        }
    }

    /// Current cursor as `(byte index, bit offset)`.
    pub fn position(&self) -> (usize, u8) {
        (self.byte_pos, self.bit_offset)
    }

    /// Total number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.byte_pos as u64 * 8 + self.bit_offset as u64
    }

    /// Whether the cursor sits on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_offset == 0
    }

    /// Number of whole or partially read bytes left, counting the current one.
    pub fn remaining_len(&self) -> usize {
        self.data.len().saturating_sub(self.byte_pos)
    }

    /// Whether every bit of the input has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.byte_pos >= self.data.len()
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let Some(&byte) = self.data.get(self.byte_pos) else {
            return Err(GpxError::end_of_stream(self.bits_read(), 0));
        };

        let bit = (byte >> (7 - self.bit_offset)) & 1;
        self.bit_offset += 1;
        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_pos += 1;
        }

        Ok(bit != 0)
    }

    /// Read up to 32 bits, first bit in the most significant position.
    ///
    /// If the input runs out mid-field the error carries the bits gathered
    /// so far in `partial`.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for _ in 0..count {
            match self.read_bit() {
                Ok(bit) => value = (value << 1) | bit as u32,
                Err(_) => return Err(GpxError::end_of_stream(self.bits_read(), value)),
            }
        }
        Ok(value)
    }

    /// Read up to 32 bits, first bit in the least significant position.
    ///
    /// Exhaustion is not an error here: bits past the end of the input read
    /// as zero, so a truncated field yields its partial accumulation.
    #[inline]
    pub fn read_bits_reversed(&mut self, count: u8) -> u32 {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for i in 0..count {
            if let Ok(true) = self.read_bit() {
                value |= 1 << i;
            }
        }
        value
    }

    /// Read one byte from the bit stream (not necessarily aligned).
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Read `count` bytes.
    ///
    /// On a byte boundary this copies straight from the input; otherwise each
    /// byte is assembled bit by bit.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        if self.is_byte_aligned() {
            let end = self.byte_pos.saturating_add(count);
            let Some(slice) = self.data.get(self.byte_pos..end) else {
                return Err(GpxError::end_of_stream(self.bits_read(), 0));
            };
            self.byte_pos = end;
            return Ok(slice.to_vec());
        }

        let mut buf = Vec::with_capacity(count);
        for _ in 0..count {
            buf.push(self.read_byte()?);
        }
        Ok(buf)
    }

    /// Read a little-endian `u32` via [`read_bytes`](Self::read_bytes).
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Take every unread byte from the current byte index to the end.
    ///
    /// Any bits already consumed from the current byte are ignored; the
    /// whole byte is included. Returns an empty slice once exhausted.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = self.data.get(self.byte_pos..).unwrap_or(&[]);
        self.byte_pos = self.data.len();
        self.bit_offset = 0;
        rest
    }
}

/// MSB-first bit writer producing an owned buffer.
///
/// This is the mirror image of [`BitReader`], used to assemble BCFZ bit
/// streams for tests and benchmarks. It performs no compression.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// Completed bytes.
    output: Vec<u8>,
    /// Byte under construction.
    current: u8,
    /// Number of bits already placed in `current`.
    bits_in_current: u8,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.current |= (bit as u8) << (7 - self.bits_in_current);
        self.bits_in_current += 1;
        if self.bits_in_current == 8 {
            self.output.push(self.current);
            self.current = 0;
            self.bits_in_current = 0;
        }
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    /// Write the low `count` bits of `value`, least significant first.
    pub fn write_bits_reversed(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");
        for i in 0..count {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    /// Write a full byte, MSB first.
    pub fn write_byte(&mut self, byte: u8) {
        self.write_bits(byte as u32, 8);
    }

    /// Write raw bytes, MSB first.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.output.len() as u64 * 8 + self.bits_in_current as u64
    }

    /// Pad the last byte with zero bits and return the buffer.
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.bits_in_current > 0 {
            self.output.push(self.current);
        }
        self.output
    }
}
