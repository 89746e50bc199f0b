//! Helpers shared by the commands.

use oxigpx_archive::{FileEntry, Gp7Layout};
use std::io;
use std::path::{Path, PathBuf};

/// Extension of Guitar Pro 7 documents.
pub const GP7_EXTENSION: &str = ".gp";

/// Append `.gp` unless the path already ends with it (any case).
pub fn with_gp_extension(path: &Path) -> PathBuf {
    let display = path.to_string_lossy();
    if display.to_lowercase().ends_with(GP7_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(GP7_EXTENSION);
        PathBuf::from(name)
    }
}

/// Whether two paths name the same location once made absolute.
pub fn same_path(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(std::path::absolute(a)? == std::path::absolute(b)?)
}

/// Human-readable size (B, KB, MB).
pub fn format_bytes(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if size >= MB {
        format!("{:.1} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}

/// Print entries as a table. Entries packaged into GP7 archives are
/// marked with `*`.
pub fn print_entries(entries: &[FileEntry], layout: &Gp7Layout) {
    println!("{:>10} {:>10}    Name", "Size", "Stored");
    println!("{}", "-".repeat(50));

    let mut total = 0u64;
    for entry in entries {
        let mark = if layout.is_recognized(&entry.name) {
            '*'
        } else {
            ' '
        };
        let short = if entry.is_short() { '!' } else { ' ' };
        println!(
            "{:>10} {:>10}{} {} {}",
            entry.size,
            entry.stored_len(),
            short,
            mark,
            entry.name
        );
        total += entry.stored_len() as u64;
    }

    println!("{}", "-".repeat(50));
    println!(
        "{:>21}      {} files",
        format_bytes(total),
        entries.len()
    );
}
