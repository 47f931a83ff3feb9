//! Language tag dictionary shared by code fences and the code macro.
//!
//! Fence tags are short markdown identifiers (`py`, `js`), macro languages are the
//! names the wiki's code macro understands (`python`, `javascript`). The two tables are
//! not inverses of each other: several fence tags collapse onto one macro language, and
//! only one canonical tag comes back.

/// Macro language used for fences without a tag.
pub const NO_LANGUAGE: &str = "none";

/// Fence tag → macro language.
const FENCE_TO_MACRO: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("yml", "yaml"),
    ("cs", "c#"),
    ("csharp", "c#"),
    ("cpp", "c++"),
    ("xml", "html/xml"),
    ("html", "html/xml"),
    ("ps1", "powershell"),
    ("psm1", "powershell"),
];

/// Macro language → fence tag.
const MACRO_TO_FENCE: &[(&str, &str)] = &[
    ("html/xml", "xml"),
    ("c#", "csharp"),
    ("c++", "cpp"),
    (NO_LANGUAGE, ""),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| *to)
}

/// Map a fence tag to the code macro language.
///
/// Lookup is case-insensitive; unknown tags pass through lower-cased and a missing or
/// blank tag becomes [`NO_LANGUAGE`].
pub fn macro_language(fence_tag: Option<&str>) -> String {
    let tag = match fence_tag.map(str::trim) {
        Some(tag) if !tag.is_empty() => tag.to_lowercase(),
        _ => return NO_LANGUAGE.to_string(),
    };
    lookup(FENCE_TO_MACRO, &tag)
        .map(str::to_string)
        .unwrap_or(tag)
}

/// Map a code macro language back to a fence tag. `none` maps to the empty tag.
pub fn fence_tag(macro_language: &str) -> String {
    let language = macro_language.trim().to_lowercase();
    lookup(MACRO_TO_FENCE, &language)
        .map(str::to_string)
        .unwrap_or(language)
}
