//! BCFS sector filesystem.
//!
//! A BCFS image is a flat buffer cut into 4096-byte sectors. Sector 0 is
//! reserved. A file is described by a header sector:
//!
//! ```text
//! +0x00  u32 LE   entry type (2 = file)
//! +0x04  [u8]     file name, NUL-terminated, at most 127 bytes
//! +0x8C  u32 LE   file size
//! +0x94  u32 LE.. data sector indices, terminated by 0
//! ```
//!
//! The data sectors are concatenated in pointer order and cut to the
//! declared size. Sectors consumed as data are never scanned as headers.
//!
//! Reads past the end of the buffer are lenient: integers read as 0 and a
//! name whose 127-byte window does not fit reads as empty.

use oxigpx_core::entry::FileEntry;
use oxigpx_core::events::{DecodeEvents, NoopEvents};

/// Size of one sector.
pub const SECTOR_SIZE: usize = 0x1000;

/// Entry type marking a file header sector.
pub const ENTRY_TYPE_FILE: u32 = 2;

/// Offset of the file name inside a header sector.
const NAME_OFFSET: usize = 0x04;

/// Width of the file name window.
const NAME_MAX_LEN: usize = 127;

/// Offset of the file size inside a header sector.
const SIZE_OFFSET: usize = 0x8C;

/// Offset of the data sector pointer table inside a header sector.
const POINTER_TABLE_OFFSET: usize = 0x94;

/// Sectors already consumed as file data.
#[derive(Debug)]
struct UsedSectors {
    marks: Vec<bool>,
}

impl UsedSectors {
    fn new(sector_count: usize) -> Self {
        Self {
            marks: vec![false; sector_count],
        }
    }

    /// Indices past the end of the image are never scanned, so they are
    /// not recorded.
    fn mark(&mut self, index: usize) {
        if let Some(mark) = self.marks.get_mut(index) {
            *mark = true;
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.marks.get(index).copied().unwrap_or(false)
    }
}

/// Read-only view of a BCFS image.
#[derive(Debug, Clone, Copy)]
pub struct SectorFileSystem<'a> {
    data: &'a [u8],
}

impl<'a> SectorFileSystem<'a> {
    /// Wrap a decompressed (or stored) image.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of sectors, counting a trailing partial one.
    pub fn sector_count(&self) -> usize {
        self.data.len().div_ceil(SECTOR_SIZE)
    }

    /// Bytes of sector `index`; the last sector may be short.
    pub fn sector(&self, index: usize) -> Option<&'a [u8]> {
        let start = index.checked_mul(SECTOR_SIZE)?;
        if start >= self.data.len() {
            return None;
        }
        let end = start.saturating_add(SECTOR_SIZE).min(self.data.len());
        Some(&self.data[start..end])
    }

    /// Extract every file described by a header sector.
    pub fn entries(&self) -> Vec<FileEntry> {
        self.entries_with(&NoopEvents)
    }

    /// Like [`entries`](Self::entries), reporting headers to `events`.
    pub fn entries_with(&self, events: &dyn DecodeEvents) -> Vec<FileEntry> {
        let mut used = UsedSectors::new(self.sector_count());
        let mut files = Vec::new();

        let mut offset = SECTOR_SIZE;
        while offset + 4 <= self.data.len() {
            let index = offset / SECTOR_SIZE;
            if !used.contains(index) {
                files.extend(self.read_file(offset, &mut used, events));
            }
            offset += SECTOR_SIZE;
        }

        files
    }

    /// Parse the sector at `offset` as a file header.
    fn read_file(
        &self,
        offset: usize,
        used: &mut UsedSectors,
        events: &dyn DecodeEvents,
    ) -> Option<FileEntry> {
        if self.u32_at(offset) != ENTRY_TYPE_FILE {
            return None;
        }

        let index = offset / SECTOR_SIZE;
        let name = self.name_at(offset + NAME_OFFSET);
        let size = self.u32_at(offset + SIZE_OFFSET) as i32;
        if name.is_empty() || size < 0 {
            events.invalid_header(index);
            return None;
        }
        let size = size as u32;
        events.file_header(index, &name, size);

        // A file never holds more bytes than the image it came from, even
        // when its chain repeats sectors.
        let wanted = (size as usize).min(self.data.len());
        let mut data = Vec::with_capacity(wanted);
        let mut pointer = offset + POINTER_TABLE_OFFSET;
        loop {
            let sector = self.u32_at(pointer) as usize;
            pointer += 4;
            if sector == 0 {
                break;
            }

            // The whole chain is marked even after the file is complete.
            used.mark(sector);
            let Some(bytes) = self.sector(sector) else {
                events.chain_truncated(&name, sector);
                break;
            };
            let remaining = wanted.saturating_sub(data.len());
            data.extend_from_slice(&bytes[..remaining.min(bytes.len())]);
        }

        Some(FileEntry::new(name, size, data))
    }

    /// Little-endian `u32` at `pos`, or 0 if it does not fit.
    fn u32_at(&self, pos: usize) -> u32 {
        pos.checked_add(4)
            .and_then(|end| self.data.get(pos..end))
            .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// NUL-terminated name in the 127-byte window at `pos`.
    fn name_at(&self, pos: usize) -> String {
        let Some(window) = self.data.get(pos..pos + NAME_MAX_LEN) else {
            return String::new();
        };
        let end = window.iter().position(|&b| b == 0).unwrap_or(window.len());
        String::from_utf8_lossy(&window[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a header sector.
    fn header(name: &str, size: u32, pointers: &[u32]) -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE];
        sector[..4].copy_from_slice(&ENTRY_TYPE_FILE.to_le_bytes());
        sector[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());
        sector[SIZE_OFFSET..SIZE_OFFSET + 4].copy_from_slice(&size.to_le_bytes());
        for (i, p) in pointers.iter().enumerate() {
            let at = POINTER_TABLE_OFFSET + 4 * i;
            sector[at..at + 4].copy_from_slice(&p.to_le_bytes());
        }
        sector
    }

    fn data_sector(fill: &[u8]) -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE];
        sector[..fill.len()].copy_from_slice(fill);
        sector
    }

    fn image(sectors: &[Vec<u8>]) -> Vec<u8> {
        sectors.concat()
    }

    #[test]
    fn test_single_file() {
        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("score.gpif", 5, &[2]),
            data_sector(b"HELLO"),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files, vec![FileEntry::new("score.gpif", 5, b"HELLO".to_vec())]);
    }

    #[test]
    fn test_sector_zero_is_never_a_header() {
        let data = image(&[header("ghost", 1, &[1]), data_sector(b"x")]);
        assert!(SectorFileSystem::new(&data).entries().is_empty());
    }

    #[test]
    fn test_chain_concatenates_in_pointer_order() {
        let mut second = data_sector(b"");
        second.fill(b'B');
        let mut first = data_sector(b"");
        first.fill(b'A');

        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("PartConfiguration", (SECTOR_SIZE + 10) as u32, &[3, 2, 0, 4]),
            second,
            first,
            data_sector(b"never read"),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.data.len(), SECTOR_SIZE + 10);
        assert!(file.data[..SECTOR_SIZE].iter().all(|&b| b == b'A'));
        assert!(file.data[SECTOR_SIZE..].iter().all(|&b| b == b'B'));
    }

    #[test]
    fn test_data_sector_not_rescanned_as_header() {
        // Sector 2 is payload that happens to look like a header.
        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("outer", 8, &[2]),
            header("inner", 1, &[3]),
            data_sector(b"z"),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "outer");
        assert_eq!(&files[0].data[..4], &ENTRY_TYPE_FILE.to_le_bytes());
    }

    #[test]
    fn test_invalid_headers_are_skipped() {
        let mut negative = header("neg", 0, &[]);
        negative[SIZE_OFFSET..SIZE_OFFSET + 4].copy_from_slice(&(-1i32).to_le_bytes());

        let mut not_a_file = header("dir", 0, &[]);
        not_a_file[..4].copy_from_slice(&1u32.to_le_bytes());

        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("", 3, &[]),
            negative,
            not_a_file,
            header("LayoutConfiguration", 0, &[]),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files, vec![FileEntry::new("LayoutConfiguration", 0, Vec::new())]);
    }

    #[test]
    fn test_pointer_past_end_stops_chain() {
        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("BinaryStylesheet", 9000, &[2, 99, 2]),
            data_sector(b"abc"),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files[0].data.len(), SECTOR_SIZE);
        assert!(files[0].is_short());
    }

    /// Header in sector 1 whose pointer table repeats sector 2 up to the
    /// end of the header sector, followed by `payload` in sector 2.
    fn repeated_chain(size: u32, payload: &[u8]) -> Vec<u8> {
        let mut data = image(&[
            vec![0; SECTOR_SIZE],
            header("score.gpif", size, &[]),
            data_sector(payload),
        ]);
        for at in (SECTOR_SIZE + POINTER_TABLE_OFFSET..2 * SECTOR_SIZE).step_by(4) {
            data[at..at + 4].copy_from_slice(&2u32.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_repeated_pointer_stays_bounded() {
        let data = repeated_chain(5, b"HELLO");

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].data, b"HELLO");
        assert!(files[0].data.capacity() <= SECTOR_SIZE);
    }

    #[test]
    fn test_repeated_pointer_with_huge_size_is_capped_at_image() {
        let data = repeated_chain(i32::MAX as u32, b"x");

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files[0].data.len(), data.len());
        assert!(files[0].data.capacity() <= data.len());
        assert!(files[0].is_short());
    }

    #[test]
    fn test_chain_marks_sectors_past_declared_size() {
        // Sector 3 follows a complete file in the chain; it is still
        // consumed and never parsed as a header.
        let data = image(&[
            vec![0; SECTOR_SIZE],
            header("score.gpif", 5, &[2, 3]),
            data_sector(b"HELLO"),
            header("ghost", 1, &[2]),
        ]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].data, b"HELLO");
    }

    #[test]
    fn test_partial_last_sector() {
        let mut data = image(&[vec![0; SECTOR_SIZE], header("misc.xml", 100, &[2])]);
        data.extend_from_slice(b"tail");

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files[0].data, b"tail");
    }

    #[test]
    fn test_truncated_header_window() {
        // Only 64 bytes of the header sector survive: the name window does
        // not fit, so the sector is skipped.
        let mut data = vec![0; SECTOR_SIZE];
        data.extend_from_slice(&header("score.gpif", 5, &[2])[..64]);

        assert!(SectorFileSystem::new(&data).entries().is_empty());
    }

    #[test]
    fn test_name_uses_full_window_without_nul() {
        let name = "n".repeat(NAME_MAX_LEN);
        let data = image(&[vec![0; SECTOR_SIZE], header(&name, 0, &[])]);

        let files = SectorFileSystem::new(&data).entries();
        assert_eq!(files[0].name.len(), NAME_MAX_LEN);
    }

    #[test]
    fn test_empty_and_tiny_images() {
        assert!(SectorFileSystem::new(&[]).entries().is_empty());
        assert!(SectorFileSystem::new(&[0; 100]).entries().is_empty());
        assert_eq!(SectorFileSystem::new(&[0; SECTOR_SIZE + 1]).sector_count(), 2);
    }

    #[test]
    fn test_sector_accessor() {
        let data = image(&[data_sector(b"a"), data_sector(b"b")]);
        let fs = SectorFileSystem::new(&data);
        assert_eq!(fs.sector(1).map(|s| s[0]), Some(b'b'));
        assert!(fs.sector(2).is_none());
        assert!(fs.sector(usize::MAX).is_none());
    }
}
