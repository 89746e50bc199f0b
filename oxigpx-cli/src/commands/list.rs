//! List command implementation.

use crate::utils::print_entries;
use oxigpx_archive::{FileEntry, Gp7Layout, GpxReader};
use oxigpx_core::TracingEvents;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// JSON serializable entry data for GPX listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    name: String,
    size: u32,
    stored: usize,
    recognized: bool,
}

impl EntryJson {
    fn from_entry(entry: &FileEntry, layout: &Gp7Layout) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            stored: entry.stored_len(),
            recognized: layout.is_recognized(&entry.name),
        }
    }
}

/// JSON output for GPX listing.
#[derive(Debug, Serialize, Deserialize)]
struct GpxListJson {
    file: String,
    format: String,
    image_size: usize,
    entries: Vec<EntryJson>,
}

pub fn cmd_list(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let reader = GpxReader::with_events(&data, &TracingEvents)?;
    let layout = Gp7Layout::DEFAULT;

    if json {
        let output = GpxListJson {
            file: input.display().to_string(),
            format: reader.format().to_string(),
            image_size: reader.image_len(),
            entries: reader
                .entries()
                .iter()
                .map(|e| EntryJson::from_entry(e, &layout))
                .collect(),
        };
        let json_output = serde_json::to_string_pretty(&output)?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("File: {} ({})", input.display(), reader.format());
    println!();
    print_entries(reader.entries(), &layout);

    Ok(())
}
