//! GPX reading: container dispatch followed by the sector filesystem.

use crate::bcfs::SectorFileSystem;
use crate::container::{ContainerFormat, open_container};
use oxigpx_core::entry::FileEntry;
use oxigpx_core::error::Result;
use oxigpx_core::events::{DecodeEvents, NoopEvents};

/// Decoded GPX file.
#[derive(Debug, Clone)]
pub struct GpxReader {
    format: ContainerFormat,
    image_len: usize,
    entries: Vec<FileEntry>,
}

impl GpxReader {
    /// Decode a whole GPX file held in memory.
    pub fn new(data: &[u8]) -> Result<Self> {
        Self::with_events(data, &NoopEvents)
    }

    /// Like [`new`](Self::new), reporting decode events to `events`.
    pub fn with_events(data: &[u8], events: &dyn DecodeEvents) -> Result<Self> {
        let (format, image) = open_container(data, events)?;
        let entries = SectorFileSystem::new(&image).entries_with(events);
        Ok(Self {
            format,
            image_len: image.len(),
            entries,
        })
    }

    /// Container format found at the start of the file.
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Size of the sector filesystem image after decompression.
    pub fn image_len(&self) -> usize {
        self.image_len
    }

    /// Recovered files in sector order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// First entry with the given name.
    pub fn entry_by_name(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Take the recovered files.
    pub fn into_entries(self) -> Vec<FileEntry> {
        self.entries
    }
}

/// Decode a GPX file and return its files.
pub fn read_gpx(data: &[u8]) -> Result<Vec<FileEntry>> {
    read_gpx_with(data, &NoopEvents)
}

/// Decode a GPX file, reporting decode events to `events`.
pub fn read_gpx_with(data: &[u8], events: &dyn DecodeEvents) -> Result<Vec<FileEntry>> {
    GpxReader::with_events(data, events).map(GpxReader::into_entries)
}
