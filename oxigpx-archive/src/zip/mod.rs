//! ZIP archive output.
//!
//! Only what a Guitar Pro 7 document needs: stored entries, directories and
//! the classic end-of-central-directory record, as described in the PKWARE
//! APPNOTE.

mod writer;

pub use writer::{
    CENTRAL_DIR_HEADER_SIG, DosDateTime, END_OF_CENTRAL_DIR_SIG, LOCAL_FILE_HEADER_SIG, ZipWriter,
};

use std::io::Write;

/// Create a new ZIP archive writer.
pub fn write_zip<W: Write>(writer: W) -> ZipWriter<W> {
    ZipWriter::new(writer)
}
