//! Decode diagnostics.
//!
//! Decoding functions take a `&dyn DecodeEvents` instead of consulting a
//! global verbosity flag. Callers that want no output pass [`NoopEvents`];
//! the CLI passes [`TracingEvents`] and lets the subscriber level decide
//! what is shown.

use tracing::{debug, trace, warn};

/// Observer notified at each notable step of a GPX decode.
///
/// Every method has an empty default body, so implementors override only
/// what they care about.
pub trait DecodeEvents {
    /// The 4-byte container magic was read.
    fn container_header(&self, _magic: &[u8; 4]) {}

    /// The BCFZ declared length was read.
    fn compressed_body(&self, _declared_len: usize) {}

    /// The bit stream ran out before the declared length was reached.
    fn stream_exhausted(&self, _bit_position: u64, _produced: usize, _declared_len: usize) {}

    /// Decompression finished with `produced` bytes (before the sub-header strip).
    fn decompressed(&self, _produced: usize) {}

    /// A valid file header sector was found.
    fn file_header(&self, _sector: usize, _name: &str, _size: u32) {}

    /// A sector had entry type 2 but an empty name or negative size.
    fn invalid_header(&self, _sector: usize) {}

    /// A pointer chain referenced a sector past the end of the buffer.
    fn chain_truncated(&self, _name: &str, _sector: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl DecodeEvents for NoopEvents {}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl DecodeEvents for TracingEvents {
    fn container_header(&self, magic: &[u8; 4]) {
        debug!("Container header: {}", String::from_utf8_lossy(magic));
    }

    fn compressed_body(&self, declared_len: usize) {
        debug!("Compressed body, declared length {declared_len} bytes");
    }

    fn stream_exhausted(&self, bit_position: u64, produced: usize, declared_len: usize) {
        warn!(
            "Compressed stream ended at bit {bit_position}: {produced} of {declared_len} bytes recovered"
        );
    }

    fn decompressed(&self, produced: usize) {
        debug!("Decompression finished. Recovered {produced} bytes");
    }

    fn file_header(&self, sector: usize, name: &str, size: u32) {
        debug!("Found file header at sector {sector}: {name} ({size} bytes)");
    }

    fn invalid_header(&self, sector: usize) {
        trace!("Sector {sector} has entry type 2 but no usable name or size");
    }

    fn chain_truncated(&self, name: &str, sector: usize) {
        warn!("Pointer chain of {name} references sector {sector} past end of data");
    }
}
