//! Import tests for Markdown format (Markdown → storage)

use crate::common::{fixture, to_storage};
use insta::assert_snapshot;
use zaira_babel::format::{ConvertOptions, Format};
use zaira_babel::formats::markdown::MarkdownFormat;

#[test]
fn test_heading_levels() {
    let storage = to_storage("# One\n\n###### Six");
    assert_eq!(storage, "<h1>One</h1>\n<h6>Six</h6>");
}

#[test]
fn test_inline_markup() {
    let storage = to_storage("Some **bold**, *italic*, `code` and [a link](https://example.com).");
    assert_eq!(
        storage,
        r#"<p>Some <strong>bold</strong>, <em>italic</em>, <code>code</code> and <a href="https://example.com">a link</a>.</p>"#
    );
}

#[test]
fn test_nested_list_depth() {
    let storage = to_storage("- A\n  - B\n    - C");
    assert_eq!(storage.matches("<ul>").count(), 3);
    assert_snapshot!(storage, @r"
    <ul>
    <li>A
    <ul>
    <li>B
    <ul>
    <li>C</li>
    </ul>
    </li>
    </ul>
    </li>
    </ul>
    ");
}

#[test]
fn test_four_space_nesting_matches_two_space() {
    assert_eq!(
        to_storage("- A\n    - B\n        - C"),
        to_storage("- A\n  - B\n    - C")
    );
}

#[test]
fn test_star_bullets_match_dashes() {
    assert_eq!(to_storage("* A\n  * B"), to_storage("- A\n  - B"));
}

#[test]
fn test_ordered_list_numbering_continues() {
    let storage = to_storage("1. First\n2. Second\n\nParagraph\n\n3. Third\n4. Fourth");
    assert_snapshot!(storage, @r#"
    <ol>
    <li>First</li>
    <li>Second</li>
    </ol>
    <p>Paragraph</p>
    <ol start="3">
    <li>Third</li>
    <li>Fourth</li>
    </ol>
    "#);
}

#[test]
fn test_toc_marker() {
    let storage = to_storage("Intro\n\n[TOC]\n\nOutro");
    assert_eq!(
        storage,
        "<p>Intro</p>\n<ac:structured-macro ac:name=\"toc\"/>\n<p>Outro</p>"
    );
}

#[test]
fn test_toc_inside_code_is_literal() {
    let storage = to_storage("```\n[TOC]\n```");
    assert!(storage.contains("<![CDATA[[TOC]\n]]>"));
    assert!(!storage.contains(r#"ac:name="toc""#));
}

#[test]
fn test_code_body_entities_are_unescaped() {
    let storage = to_storage("```js\nif (a < b && c > d) { s = \"&amp;\"; }\n```");
    assert!(storage.contains("<![CDATA[if (a < b && c > d) { s = \"&amp;\"; }\n]]>"));
}

#[test]
fn test_code_body_with_cdata_terminator_stays_well_formed() {
    let storage = to_storage("```\nx = a[b[0]]>1\n```");
    assert!(storage.contains("<![CDATA[x = a[b[0]]]]><![CDATA[>1\n]]>"));
    zaira_babel::formats::storage::validate(&storage).unwrap();
}

#[test]
fn test_images() {
    let storage = to_storage("![Arch](./images/arch.png) ![Logo](https://x.org/logo.png)");
    assert_eq!(
        storage,
        r#"<p><ac:image ac:alt="Arch"><ri:attachment ri:filename="arch.png"/></ac:image> <img src="https://x.org/logo.png" alt="Logo" /></p>"#
    );
}

#[test]
fn test_format_parse_uses_options() {
    let options = ConvertOptions::default().with_local_images(false);
    let doc = MarkdownFormat.parse("![a](a.png)", &options).unwrap();
    assert_eq!(doc.as_str(), r#"<p><img src="a.png" alt="a" /></p>"#);
}

#[test]
fn test_unknown_constructs_pass_through() {
    let storage = to_storage("~~not struck~~ and <span>raw</span>");
    assert_eq!(storage, "<p>~~not struck~~ and <span>raw</span></p>");
}

#[test]
fn test_comprehensive_fixture_is_well_formed() {
    let storage = to_storage(&fixture("comprehensive.md"));
    zaira_babel::formats::storage::validate(&storage).unwrap();
    assert_eq!(storage.matches("<ac:structured-macro ac:name=\"code\">").count(), 3);
    assert_eq!(storage.matches("<ac:image").count(), 1);
    assert!(storage.contains(r#"<ol start="3">"#));
}
