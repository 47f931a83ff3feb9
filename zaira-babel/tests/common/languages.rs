//! Fence tag ⇄ code macro language mapping through full conversions.

use super::{macro_languages, to_markdown, to_storage};

fn code_macro(language: &str) -> String {
    format!(
        r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">{language}</ac:parameter><ac:plain-text-body><![CDATA[x = 1]]></ac:plain-text-body></ac:structured-macro>"#
    )
}

#[test]
fn test_fence_tags_map_to_macro_languages() {
    let pairs = [
        ("js", "javascript"),
        ("ts", "typescript"),
        ("py", "python"),
        ("sh", "bash"),
        ("yml", "yaml"),
        ("csharp", "c#"),
    ];
    for (tag, language) in pairs {
        let storage = to_storage(&format!("```{tag}\nx = 1\n```"));
        assert_eq!(macro_languages(&storage), vec![language], "fence tag {tag}");
    }
}

#[test]
fn test_html_xml_comes_back_as_xml() {
    assert_eq!(to_markdown(&code_macro("html/xml")), "```xml\nx = 1\n```");
    let storage = to_storage("```html\n<p/>\n```");
    assert_eq!(macro_languages(&storage), vec!["html/xml"]);
}

#[test]
fn test_none_comes_back_as_bare_fence() {
    assert_eq!(to_markdown(&code_macro("none")), "```\nx = 1\n```");
    let storage = to_storage("```\nx = 1\n```");
    assert_eq!(macro_languages(&storage), vec!["none"]);
}

#[test]
fn test_unknown_languages_pass_through() {
    assert_eq!(to_markdown(&code_macro("rust")), "```rust\nx = 1\n```");
    assert_eq!(macro_languages(&to_storage("```Rust\nx\n```")), vec!["rust"]);
}
