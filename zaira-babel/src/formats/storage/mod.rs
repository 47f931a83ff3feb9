//! Storage format implementation
//!
//! The storage format is the wiki's page body: an XHTML-like fragment with no single root,
//! extended with `ac:` (content) and `ri:` (resource identifier) namespaced elements for
//! macros and attachments.
//!
//! Fragments are parsed with `roxmltree` after being wrapped in a synthetic root that
//! declares both namespace prefixes. Wiki bodies often carry HTML named entities that XML
//! does not define (`&nbsp;`, curly quotes, dashes); when the first parse fails those are
//! replaced by literal characters and the parse is retried once.
//!
//! As a [`Format`], storage is the identity on [`StorageDocument`]: parsing validates the
//! fragment, serializing returns it untouched.

pub mod elements;
pub mod entities;
pub mod escape;

use crate::error::FormatError;
use crate::format::{ConvertOptions, Format, StorageDocument};
use entities::substitute_html_entities;
use roxmltree::Node;

/// Namespace of `ac:` elements (macros, images, parameters).
pub const AC_NS: &str = "http://atlassian.com/content";
/// Namespace of `ri:` elements (attachments, urls, page links).
pub const RI_NS: &str = "http://atlassian.com/resource/identifier";

/// Wrap a fragment in a root element declaring the `ac` and `ri` prefixes.
pub fn wrap_fragment(fragment: &str) -> String {
    format!(r#"<root xmlns:ac="{AC_NS}" xmlns:ri="{RI_NS}">{fragment}</root>"#)
}

/// Parse a fragment and hand its synthetic root to `render`.
///
/// The tree borrows the wrapped source, so the caller works inside the closure.
pub(crate) fn with_parsed_fragment<R>(
    fragment: &str,
    render: impl FnOnce(Node<'_, '_>) -> R,
) -> Result<R, FormatError> {
    let wrapped = wrap_fragment(fragment);
    match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => return Ok(render(doc.root_element())),
        Err(e) => log::debug!("storage fragment rejected ({e}), retrying with HTML entities replaced"),
    }

    let substituted = wrap_fragment(&substitute_html_entities(fragment));
    let doc = roxmltree::Document::parse(&substituted)
        .map_err(|e| FormatError::ParseError(format!("XML parsing error: {e}")))?;
    Ok(render(doc.root_element()))
}

/// Check that a fragment parses, with the same entity fallback as rendering.
pub fn validate(fragment: &str) -> Result<(), FormatError> {
    with_parsed_fragment(fragment, |_| ())
}

/// Format implementation for storage-format fragments
#[derive(Default)]
pub struct StorageFormat;

impl StorageFormat {
    pub fn new() -> Self {
        StorageFormat
    }
}

impl Format for StorageFormat {
    fn name(&self) -> &str {
        "storage"
    }

    fn description(&self) -> &str {
        "Wiki storage format (XHTML fragment with ac:/ri: macros)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml", "storage"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &ConvertOptions) -> Result<StorageDocument, FormatError> {
        validate(source)?;
        Ok(StorageDocument::new(source))
    }

    fn serialize(
        &self,
        doc: &StorageDocument,
        _options: &ConvertOptions,
    ) -> Result<String, FormatError> {
        Ok(doc.as_str().to_string())
    }
}
