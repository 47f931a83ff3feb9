//! Escaping helpers for emitting storage-format markup.

/// Undo the escaping the markdown engine applies to code bodies and attributes.
///
/// Exactly four entities are handled and `&amp;` goes last, so `&amp;lt;` decodes to
/// `&lt;` rather than `<`.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Escape a value for use inside a double-quoted XML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap text in a CDATA section, splitting any `]]>` terminator inside it.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
