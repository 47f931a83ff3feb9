//! Shared helpers plus tests for the image and language helpers.

mod images;
mod languages;

use std::path::PathBuf;
use zaira_babel::{markdown_to_storage, storage_to_markdown};

pub const IMAGE_DIR: &str = "./images";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// Markdown → storage with local image conversion on.
pub fn to_storage(markdown: &str) -> String {
    markdown_to_storage(markdown, true)
}

/// Storage → markdown into the default image directory.
pub fn to_markdown(storage: &str) -> String {
    storage_to_markdown(storage, IMAGE_DIR).expect("storage should parse")
}

/// Language parameter of every code macro, in document order.
pub fn macro_languages(storage: &str) -> Vec<String> {
    let marker = r#"<ac:parameter ac:name="language">"#;
    storage
        .split(marker)
        .skip(1)
        .filter_map(|rest| rest.split_once("</ac:parameter>"))
        .map(|(language, _)| language.to_string())
        .collect()
}
