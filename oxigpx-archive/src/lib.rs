//! # OxiGPX Archive
//!
//! Guitar Pro 6 (`.gpx`) container reading and Guitar Pro 7 (`.gp`)
//! archive writing.
//!
//! - [`container`]: `BCFZ`/`BCFS` magic dispatch
//! - [`bcfs`]: the sector filesystem inside every GPX file
//! - [`gpx`]: one-call decoding into [`FileEntry`] values
//! - [`zip`]: stored-only ZIP writer
//! - [`gp7`]: Guitar Pro 7 document layout
//!
//! ## Example
//!
//! ```rust,no_run
//! use oxigpx_archive::{Gp7Writer, GpxReader};
//! use std::fs::{self, File};
//!
//! let data = fs::read("song.gpx").unwrap();
//! let reader = GpxReader::new(&data).unwrap();
//! println!("{}: {} files", reader.format(), reader.entries().len());
//!
//! let out = File::create("song.gp").unwrap();
//! Gp7Writer::new().write(out, reader.entries()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod bcfs;
pub mod container;
pub mod gp7;
pub mod gpx;
pub mod zip;

// Re-exports
pub use bcfs::{SECTOR_SIZE, SectorFileSystem};
pub use container::{ContainerFormat, open_container};
pub use gp7::{DEFAULT_STYLESHEET, Gp7Layout, Gp7Writer};
pub use gpx::{GpxReader, read_gpx, read_gpx_with};
pub use oxigpx_core::entry::FileEntry;
pub use zip::{DosDateTime, ZipWriter};
