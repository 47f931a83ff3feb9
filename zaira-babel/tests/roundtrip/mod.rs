//! Storage round-trip tests
//!
//! Markdown → storage → markdown → storage must reproduce the first storage output.

mod generated;

use crate::common::{to_markdown, to_storage};

/// Assert the storage round trip is stable and return the intermediate markdown.
pub fn assert_storage_stable(markdown: &str) -> String {
    let first = to_storage(markdown);
    let back = to_markdown(&first);
    let second = to_storage(&back);
    assert_eq!(
        second, first,
        "storage changed after a round trip\n--- markdown in ---\n{markdown}\n--- markdown back ---\n{back}"
    );
    back
}
