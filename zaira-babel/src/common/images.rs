//! Image reference rewriting between local files and page attachments.
//!
//! Markdown pages reference images by local path (`![alt](./images/a.png)`), while the
//! wiki stores them as attachments of the page (`![alt](attachment:a.png)` on the
//! markdown side, `<ac:image><ri:attachment ri:filename="a.png"/></ac:image>` in storage
//! format). These helpers only rewrite text; uploading the files is the caller's job.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Prefix marking an image destination as a page attachment.
pub const ATTACHMENT_SCHEME: &str = "attachment:";

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("valid image regex"));

/// A local image referenced from a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub alt: String,
    pub path: String,
}

/// Whether an image destination points somewhere other than the local filesystem.
///
/// Protocol-relative (`//host/a.png`) and scheme-qualified destinations (`https:`,
/// `data:`, `attachment:`) count as absolute. A single-letter scheme is read as a
/// Windows drive letter and stays local.
pub fn is_absolute_url(destination: &str) -> bool {
    if destination.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = destination.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && scheme.len() > 1
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Final path component of a local image path, with any directory prefix discarded.
pub fn attachment_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Join an image directory and an attachment filename into a local markdown path.
pub fn local_image_path(image_dir: &str, filename: &str) -> String {
    let dir = image_dir.trim_end_matches('/');
    if dir.is_empty() {
        filename.to_string()
    } else {
        format!("{dir}/{filename}")
    }
}

/// Split a link destination into the target and an optional trailing title.
fn split_title(raw: &str) -> (&str, &str) {
    let raw = raw.trim();
    match raw.find(char::is_whitespace) {
        Some(idx) => (&raw[..idx], &raw[idx..]),
        None => (raw, ""),
    }
}

/// Collect the local image references of a markdown document, in document order.
///
/// Absolute URLs and existing attachment references are skipped: they need no upload.
pub fn extract_local_images(markdown: &str) -> Vec<LocalImage> {
    IMAGE_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let (path, _) = split_title(&caps[2]);
            if is_absolute_url(path) {
                return None;
            }
            Some(LocalImage {
                alt: caps[1].to_string(),
                path: path.to_string(),
            })
        })
        .collect()
}

/// Rewrite `![alt](local/path.png)` into `![alt](attachment:path.png)`.
///
/// Absolute URLs are left untouched, so the rewrite is idempotent.
pub fn convert_images_to_attachments(markdown: &str) -> String {
    IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let (path, title) = split_title(&caps[2]);
            if is_absolute_url(path) {
                return caps[0].to_string();
            }
            format!(
                "![{}]({ATTACHMENT_SCHEME}{}{title})",
                &caps[1],
                attachment_filename(path)
            )
        })
        .into_owned()
}

/// Rewrite `![alt](attachment:a.png)` into `![alt](<image_dir>/a.png)`.
pub fn convert_attachments_to_images(markdown: &str, image_dir: &str) -> String {
    IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let (path, title) = split_title(&caps[2]);
            match path.strip_prefix(ATTACHMENT_SCHEME) {
                Some(filename) => format!(
                    "![{}]({}{title})",
                    &caps[1],
                    local_image_path(image_dir, filename)
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
