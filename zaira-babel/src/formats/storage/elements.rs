//! Storage-format element vocabulary.
//!
//! Classifies parsed elements for the markdown renderer and builds the namespaced macro
//! markup emitted by the markdown parser, so both directions agree on one shape.

use super::escape::{cdata, escape_attribute};
use super::{AC_NS, RI_NS};
use roxmltree::Node;

/// Self-closing table-of-contents macro.
pub const TOC_MACRO: &str = r#"<ac:structured-macro ac:name="toc"/>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Classification of a storage-format element for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTag {
    CodeMacro,
    TocMacro,
    UnsupportedMacro,
    Image,
    Heading(usize),
    List(ListKind),
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Block,
    Strong,
    Emphasis,
    Code,
    Link,
    Img,
    LineBreak,
    Rule,
    BlockQuote,
    Preformatted,
    /// Anything else: only the children are rendered.
    Passthrough,
}

impl StorageTag {
    pub fn of(node: Node<'_, '_>) -> StorageTag {
        let tag = node.tag_name();
        match tag.namespace() {
            Some(AC_NS) => match tag.name() {
                "structured-macro" => match node.attribute((AC_NS, "name")) {
                    Some("code") => StorageTag::CodeMacro,
                    Some("toc") => StorageTag::TocMacro,
                    _ => StorageTag::UnsupportedMacro,
                },
                "image" => StorageTag::Image,
                _ => StorageTag::Passthrough,
            },
            Some(_) => StorageTag::Passthrough,
            None => Self::from_html_name(&tag.name().to_ascii_lowercase()),
        }
    }

    fn from_html_name(name: &str) -> StorageTag {
        match name {
            "h1" => StorageTag::Heading(1),
            "h2" => StorageTag::Heading(2),
            "h3" => StorageTag::Heading(3),
            "h4" => StorageTag::Heading(4),
            "h5" => StorageTag::Heading(5),
            "h6" => StorageTag::Heading(6),
            "ul" => StorageTag::List(ListKind::Unordered),
            "ol" => StorageTag::List(ListKind::Ordered),
            "li" => StorageTag::ListItem,
            "table" => StorageTag::Table,
            "thead" => StorageTag::TableHead,
            "tr" => StorageTag::TableRow,
            "th" | "td" => StorageTag::TableCell,
            "p" | "div" => StorageTag::Block,
            "strong" | "b" => StorageTag::Strong,
            "em" | "i" => StorageTag::Emphasis,
            "code" => StorageTag::Code,
            "a" => StorageTag::Link,
            "img" => StorageTag::Img,
            "br" => StorageTag::LineBreak,
            "hr" => StorageTag::Rule,
            "blockquote" => StorageTag::BlockQuote,
            "pre" => StorageTag::Preformatted,
            _ => StorageTag::Passthrough,
        }
    }

    /// Whether the element flows inside a line of text.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            StorageTag::Strong
                | StorageTag::Emphasis
                | StorageTag::Code
                | StorageTag::Link
                | StorageTag::Img
                | StorageTag::Image
                | StorageTag::LineBreak
        )
    }
}

/// Value of a named `ac:parameter` child of a macro.
pub fn macro_parameter(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .filter(|child| child.has_tag_name((AC_NS, "parameter")))
        .find(|child| child.attribute((AC_NS, "name")) == Some(name))
        .map(text_content)
}

/// Text of the `ac:plain-text-body` child of a macro.
pub fn plain_text_body(node: Node<'_, '_>) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name((AC_NS, "plain-text-body")))
        .map(text_content)
}

/// Concatenated text of every descendant text node.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Where an `ac:image` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Attachment(String),
    Url(String),
}

pub fn image_source(node: Node<'_, '_>) -> Option<ImageSource> {
    node.children().find_map(|child| {
        if child.has_tag_name((RI_NS, "attachment")) {
            child
                .attribute((RI_NS, "filename"))
                .map(|name| ImageSource::Attachment(name.to_string()))
        } else if child.has_tag_name((RI_NS, "url")) {
            child
                .attribute((RI_NS, "value"))
                .map(|url| ImageSource::Url(url.to_string()))
        } else {
            None
        }
    })
}

/// Code macro carrying `code` verbatim in its CDATA body.
pub fn code_macro(language: &str, code: &str) -> String {
    format!(
        concat!(
            r#"<ac:structured-macro ac:name="code">"#,
            r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
            "<ac:plain-text-body>{}</ac:plain-text-body>",
            "</ac:structured-macro>"
        ),
        escape_attribute(language),
        cdata(code)
    )
}

/// Image macro referencing a page attachment. Both values are raw text.
pub fn image_macro(alt: &str, filename: &str) -> String {
    let alt = if alt.is_empty() {
        String::new()
    } else {
        format!(r#" ac:alt="{}""#, escape_attribute(alt))
    };
    format!(
        r#"<ac:image{alt}><ri:attachment ri:filename="{}"/></ac:image>"#,
        escape_attribute(filename)
    )
}
