//! Files recovered from a GPX container.

/// A named file extracted from the sector filesystem.
///
/// The stored data never exceeds the declared size: [`FileEntry::new`]
/// truncates longer payloads. It may be shorter when the pointer chain ran
/// off the end of a truncated container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name as recorded in the header sector.
    pub name: String,
    /// Size declared in the header sector.
    pub size: u32,
    /// File contents.
    pub data: Vec<u8>,
}

impl FileEntry {
    /// Create an entry, truncating `data` to `size` bytes and releasing the
    /// excess allocation.
    pub fn new(name: impl Into<String>, size: u32, mut data: Vec<u8>) -> Self {
        data.truncate(size as usize);
        data.shrink_to_fit();
        Self {
            name: name.into(),
            size,
            data,
        }
    }

    /// Number of bytes actually recovered.
    pub fn stored_len(&self) -> usize {
        self.data.len()
    }

    /// Whether fewer bytes were recovered than the header declared.
    pub fn is_short(&self) -> bool {
        self.data.len() < self.size as usize
    }
}
