//! Line-level rewrites applied before the markdown engine runs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Comment token standing in for a `[TOC]` line while the engine runs.
pub const TOC_PLACEHOLDER: &str = "<!--TOC_PLACEHOLDER-->";

/// Nesting indent the engine always reads as one level deeper.
const ENGINE_INDENT: usize = 4;

static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *)([-*+]|\d{1,9}[.)]) ").expect("valid list item regex"));

/// Tracks backtick fences, indented ones included, across a line scan.
#[derive(Debug, Default)]
pub(crate) struct FenceScanner {
    open: Option<usize>,
}

impl FenceScanner {
    /// Advance past `line`. True when the line is prose, false for fence lines and code.
    pub(crate) fn is_prose(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start_matches(' ');
        let ticks = trimmed.bytes().take_while(|b| *b == b'`').count();
        let rest = &trimmed[ticks..];
        match self.open {
            Some(open) => {
                if ticks >= open && rest.trim().is_empty() {
                    self.open = None;
                }
                false
            }
            None if ticks >= 3 && !rest.contains('`') => {
                self.open = Some(ticks);
                false
            }
            None => true,
        }
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }
}

/// Split into lines, flagging those outside fenced code blocks.
fn prose_lines(markdown: &str) -> Vec<(bool, &str)> {
    let mut fences = FenceScanner::default();
    markdown
        .split('\n')
        .map(|line| (fences.is_prose(line), line))
        .collect()
}

/// Apply `rewrite` to every line outside fenced code blocks.
fn map_prose_lines(markdown: &str, rewrite: impl Fn(&str) -> Option<String>) -> String {
    prose_lines(markdown)
        .into_iter()
        .map(|(prose, line)| {
            prose
                .then(|| rewrite(line))
                .flatten()
                .unwrap_or_else(|| line.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent and marker width of a list item line.
fn list_marker(line: &str) -> Option<(usize, usize)> {
    LIST_ITEM_RE
        .captures(line)
        .map(|caps| (caps[1].len(), caps[2].len() + 1))
}

/// Double the leading indent of nested list items.
///
/// Pages nest lists by two spaces; the engine needs nested markers past the parent's
/// content column, which doubling always reaches. Documents whose smallest nesting is
/// already four spaces or more are left alone.
pub fn normalize_list_indent(markdown: &str) -> String {
    let unit = prose_lines(markdown)
        .into_iter()
        .filter(|(prose, _)| *prose)
        .filter_map(|(_, line)| list_marker(line))
        .map(|(indent, _)| indent)
        .filter(|indent| *indent > 0)
        .min();
    match unit {
        Some(unit) if unit < ENGINE_INDENT => double_list_indent(markdown),
        _ => markdown.to_string(),
    }
}

/// Content column of an open list item, before and after doubling.
struct ItemColumns {
    source: usize,
    target: usize,
}

impl ItemColumns {
    fn shift(&self) -> usize {
        self.target - self.source
    }
}

fn indented(line: &str, extra: usize) -> String {
    if extra == 0 || line.is_empty() {
        line.to_string()
    } else {
        format!("{}{line}", " ".repeat(extra))
    }
}

/// Double list markers, moving each item's continuation lines and fenced code along
/// with its content column.
fn double_list_indent(markdown: &str) -> String {
    let mut items: Vec<ItemColumns> = Vec::new();
    let mut fences = FenceScanner::default();
    let mut fence_shift = 0;
    let mut lines = Vec::new();
    for line in markdown.split('\n') {
        let fenced = fences.in_fence();
        let prose = fences.is_prose(line);
        if fenced {
            lines.push(indented(line, fence_shift));
            continue;
        }
        if line.trim().is_empty() {
            lines.push(line.to_string());
            continue;
        }
        match list_marker(line).filter(|_| prose) {
            Some((indent, width)) => {
                let target = indent * 2;
                while items.last().is_some_and(|item| item.target > target) {
                    items.pop();
                }
                items.push(ItemColumns {
                    source: indent + width,
                    target: target + width,
                });
                lines.push(indented(line, indent));
            }
            None => {
                let indent = line.len() - line.trim_start_matches(' ').len();
                while items.last().is_some_and(|item| item.source > indent) {
                    items.pop();
                }
                let shift = items.last().map_or(0, ItemColumns::shift);
                if !prose {
                    fence_shift = shift;
                }
                lines.push(indented(line, shift));
            }
        }
    }
    lines.join("\n")
}

/// Swap standalone `[TOC]` lines for [`TOC_PLACEHOLDER`].
pub fn mark_toc(markdown: &str) -> String {
    map_prose_lines(markdown, |line| {
        (line.trim_end() == "[TOC]").then(|| TOC_PLACEHOLDER.to_string())
    })
}
