//! Markdown parsing (Markdown → storage format)
//!
//! Pipeline: attachment rewrite → list indent normalization → TOC placeholder →
//! comrak HTML → code, TOC and image macros. The steps run in that order: the macro
//! rewrites match on the HTML comrak produces, not on markdown.

use super::preprocess::{mark_toc, normalize_list_indent, TOC_PLACEHOLDER};
use crate::common::images::{convert_images_to_attachments, ATTACHMENT_SCHEME};
use crate::common::languages::macro_language;
use crate::formats::storage::elements::{code_macro, image_macro, TOC_MACRO};
use crate::formats::storage::escape::unescape_html;
use comrak::{markdown_to_html, Options};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

static CODE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre><code(?:\s+class="language-([^"]*)")?>(.*?)</code></pre>"#)
        .expect("valid code block regex")
});

static TOC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?:<p>)?{}(?:</p>)?",
        regex::escape(TOC_PLACEHOLDER)
    ))
    .expect("valid toc regex")
});

static IMG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<img\s+([^>]*?)\s*/?>").expect("valid img regex"));

static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z][\w-]*)="([^"]*)""#).expect("valid attribute regex"));

/// Convert a markdown document into a storage-format fragment.
///
/// With `convert_local_images`, local image paths become `attachment:` references first
/// and end up as image macros. Never fails: anything comrak accepts comes out as markup.
pub fn markdown_to_storage(markdown: &str, convert_local_images: bool) -> String {
    let markdown = if convert_local_images {
        convert_images_to_attachments(markdown)
    } else {
        markdown.to_string()
    };
    let markdown = mark_toc(&normalize_list_indent(&markdown));

    let html = markdown_to_html(&markdown, &default_comrak_options());

    let storage = replace_code_blocks(&html);
    let storage = TOC_RE.replace_all(&storage, TOC_MACRO);
    let storage = replace_attachment_images(&storage);
    storage.trim_end().to_string()
}

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    // The TOC placeholder is an HTML comment and must survive rendering.
    options.render.unsafe_ = true;
    options
}

fn replace_code_blocks(html: &str) -> String {
    CODE_BLOCK_RE
        .replace_all(html, |caps: &Captures| {
            let tag = caps.get(1).map(|m| unescape_html(m.as_str()));
            let language = macro_language(tag.as_deref());
            code_macro(&language, &unescape_html(&caps[2]))
        })
        .into_owned()
}

fn replace_attachment_images(html: &str) -> String {
    IMG_RE
        .replace_all(html, |caps: &Captures| {
            let mut src = None;
            let mut alt = None;
            for attr in ATTRIBUTE_RE.captures_iter(&caps[1]) {
                match &attr[1] {
                    "src" => src = Some(unescape_html(&attr[2])),
                    "alt" => alt = Some(unescape_html(&attr[2])),
                    _ => {}
                }
            }
            match src.as_deref().and_then(|s| s.strip_prefix(ATTACHMENT_SCHEME)) {
                Some(filename) => {
                    let filename = percent_decode_str(filename).decode_utf8_lossy();
                    image_macro(alt.as_deref().unwrap_or(""), &filename)
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
