//! Stored-only ZIP writer.
//!
//! Entries are written without compression, each followed by nothing but
//! its data; the central directory and end record are emitted by
//! [`ZipWriter::finish`]. Archives are limited to the classic format:
//! sizes and offsets must fit in 32 bits and there may be at most 65535
//! entries.

use oxigpx_core::crc::Crc32;
use oxigpx_core::error::{GpxError, Result};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Local file header signature.
pub const LOCAL_FILE_HEADER_SIG: u32 = 0x04034B50;

/// Central directory file header signature.
pub const CENTRAL_DIR_HEADER_SIG: u32 = 0x02014B50;

/// End of central directory signature.
pub const END_OF_CENTRAL_DIR_SIG: u32 = 0x06054B50;

/// General purpose flag: file name is UTF-8.
const FLAG_UTF8: u16 = 0x0800;

/// Version needed to extract a stored entry (1.0).
const VERSION_NEEDED: u16 = 10;

/// Version made by: Unix, APPNOTE 3.0.
const VERSION_MADE_BY: u16 = 0x031E;

/// Regular file, rw-r--r--.
const FILE_ATTR: u32 = 0o100644 << 16;

/// Directory, rwxr-xr-x.
const DIR_ATTR: u32 = 0o40755 << 16;

const LOCAL_HEADER_LEN: u64 = 30;
const CENTRAL_HEADER_LEN: u64 = 46;

/// Modification time in MS-DOS format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    /// Hours, minutes and two-second units.
    pub time: u16,
    /// Years since 1980, month and day.
    pub date: u16,
}

impl DosDateTime {
    /// 1980-01-01 00:00:00, the earliest representable instant.
    pub const EPOCH: Self = Self {
        time: 0,
        date: (1 << 5) | 1,
    };

    /// Current UTC time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self::from_unix(secs)
    }

    /// Convert seconds since the Unix epoch (UTC).
    ///
    /// Instants before 1980 map to [`EPOCH`](Self::EPOCH); years past 2107
    /// are clamped to 2107.
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let time_of_day = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        if year < 1980 {
            return Self::EPOCH;
        }
        let year = year.min(2107) as u16;

        let hours = (time_of_day / 3600) as u16;
        let minutes = ((time_of_day % 3600) / 60) as u16;
        let seconds = ((time_of_day % 60) / 2) as u16;

        Self {
            time: (hours << 11) | (minutes << 5) | seconds,
            date: ((year - 1980) << 9) | ((month as u16) << 5) | day as u16,
        }
    }
}

/// Proleptic Gregorian date for a day count relative to 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Central directory record kept until [`ZipWriter::finish`].
#[derive(Debug, Clone)]
struct CentralDirEntry {
    name: String,
    flags: u16,
    stamp: DosDateTime,
    crc32: u32,
    size: u32,
    external_attr: u32,
    local_header_offset: u32,
}

impl CentralDirEntry {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let name = self.name.as_bytes();

        writer.write_all(&CENTRAL_DIR_HEADER_SIG.to_le_bytes())?;
        writer.write_all(&VERSION_MADE_BY.to_le_bytes())?;
        writer.write_all(&VERSION_NEEDED.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?; // Method (stored)
        writer.write_all(&self.stamp.time.to_le_bytes())?;
        writer.write_all(&self.stamp.date.to_le_bytes())?;
        writer.write_all(&self.crc32.to_le_bytes())?;
        writer.write_all(&self.size.to_le_bytes())?; // Compressed size
        writer.write_all(&self.size.to_le_bytes())?; // Uncompressed size
        writer.write_all(&(name.len() as u16).to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?; // Extra field length
        writer.write_all(&0u16.to_le_bytes())?; // Comment length
        writer.write_all(&0u16.to_le_bytes())?; // Disk number start
        writer.write_all(&0u16.to_le_bytes())?; // Internal attributes
        writer.write_all(&self.external_attr.to_le_bytes())?;
        writer.write_all(&self.local_header_offset.to_le_bytes())?;
        writer.write_all(name)?;

        Ok(())
    }

    fn written_size(&self) -> u64 {
        CENTRAL_HEADER_LEN + self.name.len() as u64
    }
}

/// ZIP archive writer producing stored entries.
///
/// Call [`finish`](Self::finish) or [`into_inner`](Self::into_inner) when
/// done; dropping the writer leaves the archive without a central
/// directory.
#[derive(Debug)]
pub struct ZipWriter<W: Write> {
    writer: W,
    entries: Vec<CentralDirEntry>,
    offset: u64,
    timestamp: DosDateTime,
    finished: bool,
}

impl<W: Write> ZipWriter<W> {
    /// Create a writer stamping entries with the current time.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: Vec::new(),
            offset: 0,
            timestamp: DosDateTime::now(),
            finished: false,
        }
    }

    /// Stamp subsequent entries with `timestamp`.
    pub fn set_timestamp(&mut self, timestamp: DosDateTime) {
        self.timestamp = timestamp;
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Add a file.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let size = u32::try_from(data.len())
            .map_err(|_| GpxError::zip_limit("file size", data.len() as u64))?;
        self.add_entry(name.to_string(), data, size, FILE_ATTR)
    }

    /// Add a directory. A trailing `/` is appended when missing.
    pub fn add_directory(&mut self, name: &str) -> Result<()> {
        let dir_name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        self.add_entry(dir_name, &[], 0, DIR_ATTR)
    }

    fn add_entry(
        &mut self,
        name: String,
        data: &[u8],
        size: u32,
        external_attr: u32,
    ) -> Result<()> {
        if self.entries.len() >= u16::MAX as usize {
            let count = self.entries.len() as u64 + 1;
            return Err(GpxError::zip_limit("entry count", count));
        }
        let name_len = u16::try_from(name.len())
            .map_err(|_| GpxError::zip_limit("file name length", name.len() as u64))?;
        let local_header_offset = u32::try_from(self.offset)
            .map_err(|_| GpxError::zip_limit("local header offset", self.offset))?;

        let flags = if name.is_ascii() { 0 } else { FLAG_UTF8 };
        let crc32 = Crc32::compute(data);
        let stamp = self.timestamp;

        self.writer.write_all(&LOCAL_FILE_HEADER_SIG.to_le_bytes())?;
        self.writer.write_all(&VERSION_NEEDED.to_le_bytes())?;
        self.writer.write_all(&flags.to_le_bytes())?;
        self.writer.write_all(&0u16.to_le_bytes())?; // Method (stored)
        self.writer.write_all(&stamp.time.to_le_bytes())?;
        self.writer.write_all(&stamp.date.to_le_bytes())?;
        self.writer.write_all(&crc32.to_le_bytes())?;
        self.writer.write_all(&size.to_le_bytes())?; // Compressed size
        self.writer.write_all(&size.to_le_bytes())?; // Uncompressed size
        self.writer.write_all(&name_len.to_le_bytes())?;
        self.writer.write_all(&0u16.to_le_bytes())?; // Extra field length
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(data)?;

        self.offset += LOCAL_HEADER_LEN + name.len() as u64 + data.len() as u64;

        self.entries.push(CentralDirEntry {
            name,
            flags,
            stamp,
            crc32,
            size,
            external_attr,
            local_header_offset,
        });

        Ok(())
    }

    /// Write the central directory and the end record. Idempotent.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        let central_dir_offset = u32::try_from(self.offset)
            .map_err(|_| GpxError::zip_limit("central directory offset", self.offset))?;

        let mut central_dir_size = 0u64;
        for entry in &self.entries {
            entry.write(&mut self.writer)?;
            central_dir_size += entry.written_size();
        }
        let central_dir_size = u32::try_from(central_dir_size)
            .map_err(|_| GpxError::zip_limit("central directory size", central_dir_size))?;
        let num_entries = self.entries.len() as u16;

        self.writer.write_all(&END_OF_CENTRAL_DIR_SIG.to_le_bytes())?;
        self.writer.write_all(&0u16.to_le_bytes())?; // Disk number
        self.writer.write_all(&0u16.to_le_bytes())?; // Disk with central directory
        self.writer.write_all(&num_entries.to_le_bytes())?;
        self.writer.write_all(&num_entries.to_le_bytes())?;
        self.writer.write_all(&central_dir_size.to_le_bytes())?;
        self.writer.write_all(&central_dir_offset.to_le_bytes())?;
        self.writer.write_all(&0u16.to_le_bytes())?; // Comment length

        self.writer.flush()?;
        self.offset += u64::from(central_dir_size) + 22;
        self.finished = true;
        Ok(())
    }

    /// Finish the archive and return the inner writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        Ok(self.writer)
    }
}
