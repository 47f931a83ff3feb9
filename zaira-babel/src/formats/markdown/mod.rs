//! Markdown format implementation
//!
//! This module implements bidirectional conversion between page markdown and the wiki
//! storage format.
//!
//! # Library Choice
//!
//! Import (Markdown → storage) delegates the CommonMark grammar to `comrak`'s HTML
//! renderer and post-processes its output; storage-specific constructs are line-level
//! pre-passes or regex rewrites of the generated HTML. Export (storage → Markdown) parses
//! the fragment with `roxmltree` and renders markdown directly from the tree.
//!
//! # Element Mapping Table
//!
//! | Markdown                  | Storage format                                     | Notes                                   |
//! |---------------------------|----------------------------------------------------|-----------------------------------------|
//! | `#`..`######` heading     | `h1`..`h6`                                         | Direct mapping                          |
//! | Paragraph                 | `p` (`div` on export)                              | Blank line after                        |
//! | `- item` / `1. item`      | `ul` / `ol` + `li`                                 | 2-space nesting, `start` preserved      |
//! | Fenced code ` ```py `     | `code` structured macro, CDATA body                | Language via the tag dictionary         |
//! | `[TOC]` line              | `toc` structured macro                             | Self-closing                            |
//! | `![alt](local.png)`       | `ac:image` + `ri:attachment`                       | Path → attachment filename              |
//! | `![alt](https://…)`       | `img`                                              | Left as is                              |
//! | Pipe table                | `table`/`thead`/`tr`/`th`/`td`                     | One separator row, alignment kept       |
//! | `**bold**`, `*italic*`    | `strong`/`b`, `em`/`i`                             | Export reads both spellings             |
//! | `` `code` ``              | `code`                                             | Delimiter outgrows inner backtick runs  |
//! | `[text](url "title")`     | `a href title`                                     | Title kept when present                 |
//! | `> quote`                 | `blockquote`                                       | Direct mapping                          |
//! | `---`                     | `hr`                                               | Direct mapping                          |
//! | Hard break                | `br`                                               | Two trailing spaces                     |
//!
//! # Lossy Conversions
//!
//! - Other structured macros are dropped on export.
//! - Bullet characters normalize to `-`, nesting to two spaces. A list directly after
//!   another of the same kind switches to `*` or `)` so the two stay apart.
//! - Literal markup characters in text come back backslash-escaped.
//! - `html` and `xml` fences both come back as `xml`; `cs` comes back as `csharp`.
//! - Image titles are dropped by the image macro.
//!
//! Only storage equality is stable across round trips: converting markdown to storage,
//! back to markdown and to storage again yields the first storage output byte for byte.

mod escape;
pub mod parser;
mod preprocess;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{ConvertOptions, Format, StorageDocument};

pub use parser::markdown_to_storage;
pub use serializer::storage_to_markdown;

/// Format implementation for page markdown
#[derive(Default)]
pub struct MarkdownFormat;

impl MarkdownFormat {
    pub fn new() -> Self {
        MarkdownFormat
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Page markdown (CommonMark with pipe tables and [TOC])"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, options: &ConvertOptions) -> Result<StorageDocument, FormatError> {
        Ok(StorageDocument::new(markdown_to_storage(
            source,
            options.convert_local_images,
        )))
    }

    fn serialize(
        &self,
        doc: &StorageDocument,
        options: &ConvertOptions,
    ) -> Result<String, FormatError> {
        storage_to_markdown(doc.as_str(), &options.image_dir)
    }
}
