//! Local page documents: optional YAML front matter plus a markdown body.
//!
//! The front matter links a file to its remote page and carries page metadata:
//!
//! ```text
//! ---
//! confluence: 123456
//! title: Release Notes
//! labels: [release, notes]
//! ---
//!
//! # Release Notes
//! ```
//!
//! Only the body is ever converted to the storage format.

use crate::error::FormatError;
use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};

const FENCE: &str = "---";
const PAGE_ID_KEY: &str = "confluence";
const TITLE_KEY: &str = "title";
const LABELS_KEY: &str = "labels";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageDocument {
    pub front_matter: Mapping,
    pub body: String,
}

/// Split `content` into the raw YAML between the fences and the remaining body.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let body = &rest[offset + line.len()..];
            return Some((&rest[..offset], body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    None
}

impl PageDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            front_matter: Mapping::new(),
            body: body.into(),
        }
    }

    /// Parse a page, failing when the front matter block is not a YAML mapping.
    ///
    /// Content without a complete `---` block is all body.
    pub fn parse_strict(content: &str) -> Result<Self, FormatError> {
        let Some((yaml, body)) = split_front_matter(content) else {
            return Ok(Self::new(content));
        };
        let front_matter = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml)
                .map_err(|e| FormatError::FrontMatter(e.to_string()))?
            {
                Value::Mapping(mapping) => mapping,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(FormatError::FrontMatter(
                        "front matter is not a mapping".to_string(),
                    ))
                }
            }
        };
        Ok(Self {
            front_matter,
            body: body.to_string(),
        })
    }

    /// Parse a page; unreadable front matter leaves the whole content as body.
    pub fn parse(content: &str) -> Self {
        Self::parse_strict(content).unwrap_or_else(|e| {
            log::debug!("ignoring front matter: {e}");
            Self::new(content)
        })
    }

    /// Render the page back to text, front matter first when there is any.
    pub fn render(&self) -> Result<String, FormatError> {
        if self.front_matter.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.front_matter)
            .map_err(|e| FormatError::FrontMatter(e.to_string()))?;
        Ok(format!("{FENCE}\n{yaml}{FENCE}\n\n{}", self.body.trim_start()))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.front_matter
            .insert(Value::String(key.to_string()), value.into());
    }

    /// Title from front matter, else the first level-one heading of the body.
    pub fn title(&self) -> Option<String> {
        if let Some(title) = self.front_matter.get(TITLE_KEY).and_then(scalar_to_string) {
            return Some(title);
        }
        self.body.lines().find_map(|line| {
            line.strip_prefix("# ")
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string)
        })
    }

    /// Remote page id the file is linked to.
    pub fn page_id(&self) -> Option<String> {
        self.front_matter.get(PAGE_ID_KEY).and_then(scalar_to_string)
    }

    /// Labels given either as a list or as a comma-separated string.
    pub fn labels(&self) -> Vec<String> {
        let raw: Vec<String> = match self.front_matter.get(LABELS_KEY) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(joined)) => joined.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        raw.into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect()
    }

    /// Hex SHA-256 of the body, for change detection.
    pub fn body_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.body.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Title derived from a file name: `my-page_name` becomes `My Page Name`.
pub fn title_from_file_stem(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
