//! Guitar Pro 7 packaging.
//!
//! A `.gp` document is a ZIP archive. Besides the score files recovered
//! from the GPX container it carries a handful of fixed entries that
//! Guitar Pro 7 expects to find.

use crate::zip::{DosDateTime, write_zip};
use oxigpx_core::entry::FileEntry;
use oxigpx_core::error::{GpxError, Result};
use std::io::Write;

/// Minimal stylesheet used when the caller does not supply one.
pub const DEFAULT_STYLESHEET: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<GPStyleSheet version=\"1.0\">\n\
</GPStyleSheet>\n";

/// Layout of a Guitar Pro 7 archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gp7Layout {
    /// Document metadata, written as `{}`.
    pub meta_path: &'static str,
    /// Path of the version entry.
    pub version_path: &'static str,
    /// Contents of the version entry.
    pub version: &'static str,
    /// Viewer preferences, written as `{}`.
    pub preferences_path: &'static str,
    /// Path of the stylesheet entry.
    pub stylesheet_path: &'static str,
    /// Empty directory for score views.
    pub score_views_dir: &'static str,
    /// Directory holding the score files. Ends with `/`.
    pub content_dir: &'static str,
    /// GPX entries copied into the content directory.
    pub recognized: &'static [&'static str],
}

impl Gp7Layout {
    /// Layout written by Guitar Pro 7.
    pub const DEFAULT: Self = Self {
        meta_path: "meta.json",
        version_path: "VERSION",
        version: "7.0",
        preferences_path: "Content/Preferences.json",
        stylesheet_path: "Content/Stylesheets/score.gpss",
        score_views_dir: "Content/ScoreViews/",
        content_dir: "Content/",
        recognized: &[
            "score.gpif",
            "PartConfiguration",
            "LayoutConfiguration",
            "BinaryStylesheet",
        ],
    };

    /// Whether a GPX entry named `name` belongs in the archive.
    pub fn is_recognized(&self, name: &str) -> bool {
        self.recognized.contains(&name)
    }

    /// Archive path for a recognized entry.
    pub fn content_path(&self, name: &str) -> String {
        format!("{}{}", self.content_dir, name)
    }
}

impl Default for Gp7Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Writes decoded GPX entries as a Guitar Pro 7 archive.
#[derive(Debug, Clone)]
pub struct Gp7Writer<'a> {
    layout: Gp7Layout,
    stylesheet: &'a [u8],
    timestamp: Option<DosDateTime>,
}

impl<'a> Gp7Writer<'a> {
    /// Writer with the default layout and stylesheet.
    pub fn new() -> Self {
        Self {
            layout: Gp7Layout::DEFAULT,
            stylesheet: DEFAULT_STYLESHEET,
            timestamp: None,
        }
    }

    /// Use a different layout.
    pub fn with_layout(mut self, layout: Gp7Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Use the given stylesheet bytes.
    pub fn with_stylesheet(mut self, stylesheet: &'a [u8]) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Stamp every entry with `timestamp` instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DosDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The layout in use.
    pub fn layout(&self) -> &Gp7Layout {
        &self.layout
    }

    /// Write the archive and return the number of score files packaged.
    ///
    /// Fails with [`GpxError::NoContent`] before writing anything when no
    /// entry is recognized.
    pub fn write<W: Write>(&self, writer: W, entries: &[FileEntry]) -> Result<usize> {
        let content: Vec<&FileEntry> = entries
            .iter()
            .filter(|e| self.layout.is_recognized(&e.name))
            .collect();
        if content.is_empty() {
            return Err(GpxError::no_content(self.layout.recognized));
        }

        let mut zip = write_zip(writer);
        if let Some(stamp) = self.timestamp {
            zip.set_timestamp(stamp);
        }

        let layout = &self.layout;
        zip.add_file(layout.meta_path, b"{}")?;
        zip.add_file(layout.version_path, layout.version.as_bytes())?;
        zip.add_file(layout.preferences_path, b"{}")?;
        zip.add_file(layout.stylesheet_path, self.stylesheet)?;
        zip.add_directory(layout.score_views_dir)?;

        for entry in &content {
            zip.add_file(&layout.content_path(&entry.name), &entry.data)?;
        }

        zip.finish()?;
        Ok(content.len())
    }
}

impl Default for Gp7Writer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
