//! Fragment parsing, entity fallback and the storage format's registry behavior.

use zaira_babel::formats::storage::{validate, wrap_fragment};
use zaira_babel::{ConvertOptions, FormatError, FormatRegistry};

#[test]
fn test_wrapped_fragment_declares_both_namespaces() {
    let wrapped = wrap_fragment("<p>x</p>");
    assert!(wrapped.starts_with("<root "));
    assert!(wrapped.contains(r#"xmlns:ac="http://atlassian.com/content""#));
    assert!(wrapped.contains(r#"xmlns:ri="http://atlassian.com/resource/identifier""#));
    assert!(wrapped.ends_with("<p>x</p></root>"));
}

#[test]
fn test_multiple_top_level_elements_are_accepted() {
    validate("<h1>a</h1><p>b</p><ac:structured-macro ac:name=\"toc\"/>").unwrap();
    validate("").unwrap();
    validate("plain text only").unwrap();
}

#[test]
fn test_html_entities_fall_back() {
    for entity in ["&nbsp;", "&lsquo;", "&rsquo;", "&ldquo;", "&rdquo;", "&mdash;", "&ndash;", "&hellip;"] {
        validate(&format!("<p>a{entity}b</p>")).unwrap_or_else(|e| panic!("{entity}: {e}"));
    }
}

#[test]
fn test_entity_text_reaches_markdown() {
    let md = zaira_babel::storage_to_markdown("<p>&ldquo;quoted&rdquo; &ndash; done&hellip;</p>", "./images").unwrap();
    assert_eq!(md, "\u{201c}quoted\u{201d} \u{2013} done\u{2026}");
}

#[test]
fn test_undeclared_prefix_is_rejected() {
    let result = validate(r#"<xx:widget xx:name="a"/>"#);
    assert!(matches!(result, Err(FormatError::ParseError(_))));
}

#[test]
fn test_storage_to_storage_is_identity() {
    let registry = FormatRegistry::default();
    let body = r#"<p>x</p><ac:structured-macro ac:name="toc"/>"#;
    let out = registry
        .convert(body, "storage", "storage", &ConvertOptions::default())
        .unwrap();
    assert_eq!(out, body);
}
