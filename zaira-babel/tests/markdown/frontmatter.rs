//! Front matter handling around page conversion.

use crate::common::{fixture, to_markdown, to_storage};
use zaira_babel::page::title_from_file_stem;
use zaira_babel::PageDocument;

#[test]
fn test_page_fixture_metadata() {
    let page = PageDocument::parse(&fixture("page.md"));
    assert_eq!(page.page_id().as_deref(), Some("98765"));
    assert_eq!(page.title().as_deref(), Some("Team Handbook"));
    assert_eq!(page.labels(), vec!["handbook", "onboarding"]);
    assert!(page.body.starts_with("# Team Handbook"));
}

#[test]
fn test_only_the_body_is_converted() {
    let page = PageDocument::parse(&fixture("page.md"));
    let storage = to_storage(&page.body);
    assert!(!storage.contains("confluence"));
    assert!(storage.starts_with("<h1>Team Handbook</h1>"));
    assert!(storage.contains(r#"<ri:attachment ri:filename="org-chart.png"/>"#));
}

#[test]
fn test_pulled_body_keeps_local_front_matter() {
    let mut page = PageDocument::parse(&fixture("page.md"));
    let remote = "<h1>Team Handbook</h1><p>Updated remotely.</p>";
    page.body = to_markdown(remote);

    let rendered = page.render().unwrap();
    assert!(rendered.starts_with("---\nconfluence: 98765\n"));
    assert!(rendered.ends_with("---\n\n# Team Handbook\nUpdated remotely."));
    assert_eq!(PageDocument::parse(&rendered).page_id().as_deref(), Some("98765"));
}

#[test]
fn test_body_hash_detects_local_edits() {
    let original = PageDocument::parse(&fixture("page.md"));
    let mut edited = original.clone();
    edited.body.push_str("\nOne more line.\n");
    assert_ne!(original.body_hash(), edited.body_hash());
}

#[test]
fn test_title_falls_back_to_file_stem() {
    let page = PageDocument::parse("No heading here.");
    let title = page
        .title()
        .unwrap_or_else(|| title_from_file_stem("team-handbook"));
    assert_eq!(title, "Team Handbook");
}
