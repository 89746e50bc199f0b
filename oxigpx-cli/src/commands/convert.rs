//! Convert command implementation.

use crate::utils::{same_path, with_gp_extension};
use oxigpx_archive::{DEFAULT_STYLESHEET, Gp7Writer, GpxReader};
use oxigpx_core::TracingEvents;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// Options for converting a GPX file.
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stylesheet: Option<PathBuf>,
}

pub fn cmd_convert(options: &ConvertOptions) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let input = &options.input;
    let output = with_gp_extension(&options.output);

    if same_path(input, &output)? {
        return Err(format!(
            "input and output refer to the same file: {}",
            input.display()
        )
        .into());
    }
    if output.exists() {
        return Err(format!("output file already exists: {}", output.display()).into());
    }

    println!("Reading: {}", input.display());
    let data = fs::read(input)?;
    let reader = GpxReader::with_events(&data, &TracingEvents)?;
    debug!(
        "{} container, {} byte image",
        reader.format(),
        reader.image_len()
    );

    let stylesheet: Cow<'_, [u8]> = match &options.stylesheet {
        Some(path) => Cow::Owned(fs::read(path)?),
        None => Cow::Borrowed(DEFAULT_STYLESHEET),
    };

    println!(
        "Found {} raw files. Writing archive to: {}",
        reader.entries().len(),
        output.display()
    );

    let file = File::create_new(&output)?;
    let written = match write_archive(file, &reader, &stylesheet) {
        Ok(written) => written,
        Err(e) => {
            // Do not leave a half-written archive behind.
            if let Err(remove_err) = fs::remove_file(&output) {
                debug!("Could not remove {}: {}", output.display(), remove_err);
            }
            return Err(e);
        }
    };
    debug!("Packaged {} score files", written);

    println!("Success! Converted in {:.2?}", start.elapsed());
    Ok(())
}

fn write_archive(
    file: File,
    reader: &GpxReader,
    stylesheet: &[u8],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(file);
    let written = Gp7Writer::new()
        .with_stylesheet(stylesheet)
        .write(&mut writer, reader.entries())?;
    writer.flush()?;
    Ok(written)
}
