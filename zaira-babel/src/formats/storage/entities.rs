//! HTML named entities that show up in wiki bodies but are unknown to XML.

/// Entities replaced by their literal character before the second parse attempt.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", "\u{00a0}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201c}"),
    ("&rdquo;", "\u{201d}"),
    ("&mdash;", "\u{2014}"),
    ("&ndash;", "\u{2013}"),
    ("&hellip;", "\u{2026}"),
];

/// Replace the known HTML-only entities with literal Unicode.
pub fn substitute_html_entities(source: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(source.to_string(), |text, (entity, literal)| {
            text.replace(entity, literal)
        })
}
