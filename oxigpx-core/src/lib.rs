//! # OxiGPX Core
//!
//! Core components for the OxiGPX container decoder.
//!
//! This crate provides the building blocks shared by the codec and the
//! container crates:
//!
//! - [`bitstream`]: MSB-first bit reader with normal and reversed field order
//! - [`crc`]: CRC-32 checksums for ZIP output
//! - [`entry`]: Files recovered from a container
//! - [`events`]: Injected decode diagnostics
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     gpx2gp convert / list                               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     BCFZ/BCFS dispatch, sector filesystem, GP7 ZIP      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     BCFZ bit-level LZ decompression                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, CRC-32, FileEntry              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxigpx_core::bitstream::BitReader;
//! use oxigpx_core::crc::Crc32;
//!
//! let data = [0xAB, 0xCD];
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
//!
//! assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod crc;
pub mod entry;
pub mod error;
pub mod events;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc32;
pub use entry::FileEntry;
pub use error::{GpxError, Result};
pub use events::{DecodeEvents, NoopEvents, TracingEvents};
