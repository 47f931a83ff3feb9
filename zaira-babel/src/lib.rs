//! Markdown ⇄ wiki storage format conversion
//!
//!     This crate converts local page markdown into the wiki's storage format (an XHTML
//!     fragment with `ac:`/`ri:` namespaced macros) and back again.
//!
//!     This is a pure lib, that is, it powers the zaira-cli but is shell agnostic: no code
//!     here prints, reads env vars or touches the filesystem. Fetching and storing page
//!     bodies and uploading attachments happen in the caller.
//!
//! Architecture
//!
//!     The storage format is the hub representation. Every format converts into and out
//!     of a StorageDocument through the Format trait, and the FormatRegistry picks formats
//!     by name or file extension.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait, StorageDocument, ConvertOptions
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── page.rs                 # Front matter + body of a local page
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── preprocess.rs   # Line-level rewrites before comrak
//!     │   │   ├── parser.rs       # Markdown → storage
//!     │   │   ├── serializer.rs   # Storage → markdown
//!     │   │   └── mod.rs
//!     │   └── storage
//!     │       ├── elements.rs     # Tag classification and macro builders
//!     │       ├── entities.rs     # HTML entity fallback
//!     │       ├── escape.rs
//!     │       └── mod.rs          # Fragment parsing
//!     └── common
//!         ├── images.rs           # Local image ⇄ attachment rewriting
//!         └── languages.rs        # Fence tag ⇄ code macro language
//!
//! Testing
//!     tests
//!     ├── <area>
//!     │   └── <testname>.rs
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to
//!     include these in the mod.
//!
//! Round Trips
//!
//!     Markdown is the editing surface and the storage format is what the wiki keeps, so the
//!     guarantee is on storage: markdown → storage → markdown → storage reproduces the first
//!     storage output byte for byte. The intermediate markdown may differ cosmetically
//!     (bullet characters, indentation).
//!
//! Library Choices
//!
//!     The CommonMark grammar is comrak's job; this crate only pre-processes the markdown and
//!     post-processes comrak's HTML into storage constructs. Storage fragments are read with
//!     roxmltree.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod page;
pub mod registry;

pub use common::images::{
    convert_attachments_to_images, convert_images_to_attachments, extract_local_images,
    LocalImage,
};
pub use error::FormatError;
pub use format::{ConvertOptions, Format, StorageDocument};
pub use page::PageDocument;
pub use registry::FormatRegistry;

/// Converts markdown into a storage-format fragment.
///
/// With `convert_local_images`, `![alt](local/path.png)` becomes an attachment image
/// macro; absolute URLs stay plain images.
pub fn markdown_to_storage(markdown: &str, convert_local_images: bool) -> String {
    formats::markdown::markdown_to_storage(markdown, convert_local_images)
}

/// Converts a storage-format fragment into markdown.
///
/// Attachment images come back as `image_dir/<filename>`.
///
/// # Errors
///
/// [`FormatError::ParseError`] when the fragment is not well-formed XML, even after HTML
/// named entities are replaced.
pub fn storage_to_markdown(storage: &str, image_dir: &str) -> Result<String, FormatError> {
    formats::markdown::storage_to_markdown(storage, image_dir)
}
