//! Document loading seam.
//!
//! A [`DocumentLoader`] turns a file path into an ordered sequence of
//! [`TextUnit`]s. The pipeline never reads source files itself; injecting the
//! loader keeps format support (plain text, PDF, future formats) out of the
//! core and makes failure injection trivial in tests.

use std::fs;
use std::path::Path;

use crate::error::{IndexError, Result};

/// One ordered unit of text extracted from a source document.
#[derive(Clone, Debug)]
pub struct TextUnit {
    /// Zero-based position of the unit within the document.
    pub order: usize,
    /// Extracted text.
    pub text: String,
}

impl TextUnit {
    /// Creates a text unit.
    #[must_use]
    pub fn new(order: usize, text: impl Into<String>) -> Self {
        Self {
            order,
            text: text.into(),
        }
    }
}

/// Trait for format-specific document readers.
pub trait DocumentLoader: Send + Sync {
    /// Reads the document at `path` into ordered text units.
    ///
    /// # Errors
    /// Returns [`IndexError::DocumentUnreadable`] if the path does not exist
    /// or the format cannot be parsed.
    fn load(&self, path: &Path) -> Result<Vec<TextUnit>>;

    /// Returns the loader name.
    fn name(&self) -> &'static str;
}

/// Loader for plain UTF-8 text files.
///
/// The whole file becomes a single text unit; chunking happens downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load(&self, path: &Path) -> Result<Vec<TextUnit>> {
        let text = fs::read_to_string(path).map_err(|err| IndexError::document(path, err))?;
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![TextUnit::new(0, text)])
    }

    fn name(&self) -> &'static str {
        "plain_text"
    }
}
