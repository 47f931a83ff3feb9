//! Escaping for literal text written out as markdown.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Characters and sequences the engine would read as inline markup or entities.
static INLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\\`*_\[\]]|&#?[A-Za-z0-9]+;|<[A-Za-z/!?]").expect("valid inline markup regex")
});

/// Line openers that start a block: ordered markers, headings, quotes, bullets,
/// setext underlines and tilde fences.
static LINE_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^( *)(?:(\d{1,9})([.)])|([#>+=~-]))").expect("valid line start regex")
});

/// Escape `text` so the engine reads it back as the same characters.
///
/// `at_line_start` says whether the first line of `text` opens a markdown line; every
/// later line always does.
pub fn escape_text(text: &str, at_line_start: bool) -> String {
    escape_inline(text)
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index > 0 || at_line_start {
                escape_line_start(line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape inline markup only, for text that never opens a line.
pub fn escape_inline(text: &str) -> String {
    INLINE_RE
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            match matched.strip_prefix('<') {
                Some(rest) => format!("&lt;{rest}"),
                None => format!("\\{matched}"),
            }
        })
        .into_owned()
}

fn escape_line_start(line: &str) -> String {
    LINE_START_RE
        .replace(line, |caps: &Captures| {
            let indent = &caps[1];
            match (caps.get(2), caps.get(3), caps.get(4)) {
                (Some(digits), Some(delimiter), _) => {
                    format!("{indent}{}\\{}", digits.as_str(), delimiter.as_str())
                }
                (_, _, Some(opener)) => format!("{indent}\\{}", opener.as_str()),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Link or image destination, with the title quoted when there is one.
pub fn destination(target: &str, title: Option<&str>) -> String {
    match title.filter(|title| !title.is_empty()) {
        Some(title) => format!(
            "{target} \"{}\"",
            title.replace('\\', "\\\\").replace('"', "\\\"")
        ),
        None => target.to_string(),
    }
}

/// Code span delimited by one more backtick than the longest run inside `code`.
pub fn code_span(code: &str) -> String {
    let longest = code.split(|c: char| c != '`').map(str::len).max().unwrap_or(0);
    let delimiter = "`".repeat(longest + 1);
    let padded = longest > 0
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if padded {
        format!("{delimiter} {code} {delimiter}")
    } else {
        format!("{delimiter}{code}{delimiter}")
    }
}
