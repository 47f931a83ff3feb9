//! Export tests for Markdown format (storage → Markdown)

use crate::common::to_markdown;
use insta::assert_snapshot;
use zaira_babel::storage_to_markdown;

#[test]
fn test_nested_list_indents() {
    let storage = "<ul>\n<li>A\n<ul>\n<li>B\n<ul>\n<li>C</li>\n</ul>\n</li>\n</ul>\n</li>\n</ul>";
    let md = to_markdown(storage);
    let indents: Vec<usize> = md
        .lines()
        .map(|line| line.len() - line.trim_start().len())
        .collect();
    assert_eq!(indents, vec![0, 2, 4]);
}

#[test]
fn test_ordered_list_start() {
    let md = to_markdown(r#"<ol start="3"><li>Third</li><li>Fourth</li></ol>"#);
    assert_eq!(md, "3. Third\n4. Fourth");
}

#[test]
fn test_mixed_nested_lists() {
    let storage = concat!(
        "<ol>\n<li>Setup\n<ul>\n<li>Install</li>\n<li>Configure</li>\n</ul>\n</li>\n",
        "<li>Run</li>\n</ol>"
    );
    assert_snapshot!(to_markdown(storage), @r"
    1. Setup
      - Install
      - Configure
    2. Run
    ");
}

#[test]
fn test_toc_macro_becomes_marker_line() {
    let md = to_markdown(
        "<p>Intro</p>\n<ac:structured-macro ac:name=\"toc\"/>\n<p>Outro</p>",
    );
    assert_eq!(md, "Intro\n\n[TOC]\n\nOutro");
}

#[test]
fn test_attachment_image_uses_image_dir() {
    let storage = r#"<p><ac:image ac:alt="Arch"><ri:attachment ri:filename="arch.png"/></ac:image></p>"#;
    assert_eq!(to_markdown(storage), "![Arch](./images/arch.png)");
    assert_eq!(
        storage_to_markdown(storage, "docs/img").unwrap(),
        "![Arch](docs/img/arch.png)"
    );
    assert_eq!(storage_to_markdown(storage, "").unwrap(), "![Arch](arch.png)");
}

#[test]
fn test_wiki_authored_page() {
    // Bodies written in the wiki editor carry no newlines between blocks.
    let storage = concat!(
        "<h1>Runbook</h1><p>Restart steps&hellip;</p>",
        "<ol><li><p>Drain the node</p></li><li><p>Restart <code>svc</code></p></li></ol>",
        r#"<ac:structured-macro ac:name="info"><ac:rich-text-body><p>Note</p></ac:rich-text-body></ac:structured-macro>"#,
        r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">bash</ac:parameter>"#,
        "<ac:plain-text-body><![CDATA[systemctl restart svc]]></ac:plain-text-body></ac:structured-macro>"
    );
    assert_snapshot!(to_markdown(storage), @r"
    # Runbook
    Restart steps…

    1. Drain the node

    2. Restart `svc`

    ```bash
    systemctl restart svc
    ```
    ");
}

#[test]
fn test_malformed_fragment_is_parse_error() {
    let err = storage_to_markdown("<p><strong>unclosed</p>", "./images").unwrap_err();
    assert!(matches!(err, zaira_babel::FormatError::ParseError(_)));
    assert!(err.to_string().contains("XML parsing error"));
}
