//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! Every format converts into and out of a [`StorageDocument`], the wiki's storage-format
//! body, which acts as the hub representation between formats.

use crate::error::FormatError;
use std::fmt;

/// Default directory that attachment images are mapped to when pulling a page.
pub const DEFAULT_IMAGE_DIR: &str = "./images";

/// A storage-format fragment: XHTML-like markup plus `ac:`/`ri:` namespaced macros.
///
/// The fragment has no single root element; it is the body of a wiki page exactly as
/// the remote API stores it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageDocument {
    body: String,
}

impl StorageDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn into_string(self) -> String {
        self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

impl fmt::Display for StorageDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

impl From<String> for StorageDocument {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

/// Options shared by every conversion direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Rewrite local `![alt](path)` images to `attachment:` references before conversion
    pub convert_local_images: bool,
    /// Directory prefix used when attachment images are turned back into local paths
    pub image_dir: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            convert_local_images: true,
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_local_images(mut self, enabled: bool) -> Self {
        self.convert_local_images = enabled;
        self
    }

    pub fn with_image_dir(mut self, image_dir: impl Into<String>) -> Self {
        self.image_dir = image_dir.into();
        self
    }
}

/// Trait for document formats
///
/// Implementors provide conversion between a text representation and the storage format.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str, options: &ConvertOptions) -> Result<StorageDocument, FormatError> {
///         // Convert source to storage format
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "storage")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → storage)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (storage → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Convert source text into a storage document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(
        &self,
        _source: &str,
        _options: &ConvertOptions,
    ) -> Result<StorageDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Render a storage document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(
        &self,
        _doc: &StorageDocument,
        _options: &ConvertOptions,
    ) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
