//! FILENAME: core/table-export/src/target.rs
//! Delivery of generated content.
//!
//! Content is always generated in full before a target is touched, so a
//! failed export never leaves a partial file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::ExportError;

/// Where exported content goes: a "download" or a print surface.
pub trait ExportTarget {
    /// Delivers a finished file.
    fn save_file(&mut self, filename: &str, mime_type: &str, contents: &[u8]) -> Result<(), ExportError>;

    /// Hands a print document to a print surface.
    /// Returns [`ExportError::PopupBlocked`] when no surface can be opened.
    fn print_document(&mut self, filename: &str, html: &str) -> Result<(), ExportError>;
}

// ============================================================================
// DIRECTORY TARGET
// ============================================================================

/// Writes exports into a directory.
///
/// Files are written to a temporary file in the same directory and then
/// persisted under their final name, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
    allow_print: bool,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryTarget {
            dir: dir.into(),
            allow_print: true,
        }
    }

    /// Refuse print documents (they fail as popup-blocked).
    pub fn without_print(mut self) -> Self {
        self.allow_print = false;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Print documents land beside downloads as `<stem>.print.html`.
    pub fn print_filename(filename: &str) -> String {
        let stem = filename.strip_suffix(".html").unwrap_or(filename);
        format!("{}.print.html", stem)
    }

    /// Resolves `filename` inside the target directory, rejecting paths.
    fn path_for(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.to_str() == Some(filename))
            .ok_or_else(|| ExportError::InvalidOptions(format!("invalid filename: {:?}", filename)))?;
        Ok(self.dir.join(name))
    }

    fn write_atomic(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.path_for(filename)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| ExportError::Io(e.error))?;
        debug!("wrote {} bytes to {:?}", contents.len(), path);
        Ok(path)
    }
}

impl ExportTarget for DirectoryTarget {
    fn save_file(&mut self, filename: &str, _mime_type: &str, contents: &[u8]) -> Result<(), ExportError> {
        self.write_atomic(filename, contents).map(|_| ())
    }

    fn print_document(&mut self, filename: &str, html: &str) -> Result<(), ExportError> {
        if !self.allow_print {
            return Err(ExportError::PopupBlocked);
        }
        self.write_atomic(&Self::print_filename(filename), html.as_bytes()).map(|_| ())
    }
}

// ============================================================================
// MEMORY TARGET
// ============================================================================

/// A file delivered to a [`MemoryTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl SavedFile {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// A document handed to a [`MemoryTarget`]'s print surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedDocument {
    pub filename: String,
    pub html: String,
}

/// Keeps delivered content in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    pub files: Vec<SavedFile>,
    pub printed: Vec<PrintedDocument>,
    /// Refuse print documents (they fail as popup-blocked).
    pub block_print: bool,
    /// Fail every save with this message.
    pub fail_saves: Option<String>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_file(&self) -> Option<&SavedFile> {
        self.files.last()
    }
}

impl ExportTarget for MemoryTarget {
    fn save_file(&mut self, filename: &str, mime_type: &str, contents: &[u8]) -> Result<(), ExportError> {
        if let Some(message) = &self.fail_saves {
            return Err(ExportError::Delivery(message.clone()));
        }
        self.files.push(SavedFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            contents: contents.to_vec(),
        });
        Ok(())
    }

    fn print_document(&mut self, filename: &str, html: &str) -> Result<(), ExportError> {
        if self.block_print {
            return Err(ExportError::PopupBlocked);
        }
        self.printed.push(PrintedDocument {
            filename: filename.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}
