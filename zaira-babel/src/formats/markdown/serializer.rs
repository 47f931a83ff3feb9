//! Markdown serialization (storage format → Markdown)
//!
//! Walks the parsed fragment depth-first and dispatches on [`StorageTag`]. List and table
//! state lives in a [`RenderContext`] created per call; nothing is shared across calls.

use super::escape::{code_span, destination, escape_inline, escape_text};
use super::preprocess::FenceScanner;
use crate::common::images::local_image_path;
use crate::common::languages::fence_tag;
use crate::error::FormatError;
use crate::formats::storage::elements::{
    image_source, macro_parameter, plain_text_body, text_content, ImageSource, ListKind,
    StorageTag,
};
use crate::formats::storage::{with_parsed_fragment, AC_NS};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use roxmltree::{Node, NodeType};

/// Characters that would end or break a markdown link destination.
const DESTINATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>');

static TEXT_ALIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"text-align\s*:\s*(left|center|right)").expect("valid text-align regex")
});

/// Convert a storage-format fragment into markdown.
///
/// Attachment images are mapped to `image_dir/<filename>`. Fails only when the fragment
/// is not well-formed XML, even after HTML entities are replaced.
pub fn storage_to_markdown(storage: &str, image_dir: &str) -> Result<String, FormatError> {
    let rendered = with_parsed_fragment(storage, |root| {
        let mut ctx = RenderContext::new(image_dir);
        let mut out = String::new();
        render_children(root, &mut ctx, &mut out);
        out
    })?;
    Ok(collapse_blank_lines(&rendered))
}

struct ListFrame {
    kind: ListKind,
    next_ordinal: u64,
    /// Use `*` or `)` so the list does not merge into a preceding one of its kind
    alternate: bool,
}

impl ListFrame {
    fn next_marker(&mut self) -> String {
        match self.kind {
            ListKind::Unordered if self.alternate => "* ".to_string(),
            ListKind::Unordered => "- ".to_string(),
            ListKind::Ordered => {
                let delimiter = if self.alternate { ')' } else { '.' };
                let marker = format!("{}{delimiter} ", self.next_ordinal);
                self.next_ordinal = self.next_ordinal.saturating_add(1);
                marker
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn of(cell: Node<'_, '_>) -> Alignment {
        let declared = cell.attribute("align").map(str::to_ascii_lowercase).or_else(|| {
            cell.attribute("style")
                .and_then(|style| TEXT_ALIGN_RE.captures(style))
                .map(|caps| caps[1].to_string())
        });
        match declared.as_deref() {
            Some("left") => Alignment::Left,
            Some("center") => Alignment::Center,
            Some("right") => Alignment::Right,
            _ => Alignment::None,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}

/// Header bookkeeping for the table being rendered.
#[derive(Default)]
struct TableState {
    in_thead: bool,
    header_done: bool,
    /// Alignments of the last row seen inside `thead`
    pending_header: Option<Vec<Alignment>>,
}

struct RenderContext<'a> {
    image_dir: &'a str,
    lists: Vec<ListFrame>,
    table: Option<TableState>,
}

impl<'a> RenderContext<'a> {
    fn new(image_dir: &'a str) -> Self {
        Self {
            image_dir,
            lists: Vec::new(),
            table: None,
        }
    }

    /// Inside a list or table, whitespace-only text is layout noise.
    fn suppresses_whitespace(&self) -> bool {
        !self.lists.is_empty() || self.table.is_some()
    }
}

fn render_node(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    match node.node_type() {
        NodeType::Element => render_element(node, ctx, out),
        NodeType::Text => render_text(node, ctx, out),
        _ => {}
    }
}

fn render_children(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    for child in node.children() {
        render_node(child, ctx, out);
    }
}

fn render_to_string(node: Node<'_, '_>, ctx: &mut RenderContext<'_>) -> String {
    let mut out = String::new();
    render_children(node, ctx, &mut out);
    out
}

fn is_inline(node: Option<Node<'_, '_>>) -> bool {
    node.is_some_and(|n| n.is_element() && StorageTag::of(n).is_inline())
}

fn is_tag(node: Option<Node<'_, '_>>, tag: StorageTag) -> bool {
    node.is_some_and(|n| n.is_element() && StorageTag::of(n) == tag)
}

fn render_text(node: Node<'_, '_>, ctx: &RenderContext<'_>, out: &mut String) {
    let Some(mut text) = node.text() else {
        return;
    };
    // The break already ended the line.
    if is_tag(node.prev_sibling(), StorageTag::LineBreak) {
        text = text.strip_prefix('\n').unwrap_or(text);
    }
    if text.trim().is_empty() && ctx.suppresses_whitespace() {
        if is_inline(node.prev_sibling()) && is_inline(node.next_sibling()) {
            out.push(' ');
        }
        return;
    }
    let at_line_start = out.is_empty() || out.ends_with('\n');
    out.push_str(&escape_text(text, at_line_start));
}

fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn render_element(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    match StorageTag::of(node) {
        StorageTag::CodeMacro => {
            let tag = macro_parameter(node, "language")
                .map(|language| fence_tag(&language))
                .unwrap_or_default();
            let code = plain_text_body(node).unwrap_or_default();
            write_fenced(out, &tag, &code);
        }
        StorageTag::TocMacro => out.push_str("\n[TOC]\n"),
        StorageTag::UnsupportedMacro => {
            log::debug!(
                "dropping unsupported macro '{}'",
                node.attribute((AC_NS, "name")).unwrap_or("")
            );
        }
        StorageTag::Image => render_image_macro(node, ctx, out),
        StorageTag::Heading(level) => {
            let text = render_to_string(node, ctx);
            let text = protect_closing_hashes(&text.trim().replace('\n', " "));
            ensure_line_start(out);
            out.push_str(&format!("\n{} {}\n", "#".repeat(level), text));
        }
        StorageTag::List(kind) => render_list(node, kind, ctx, out),
        StorageTag::ListItem => render_list_item(node, ctx, out),
        StorageTag::Table => {
            let outer = ctx.table.replace(TableState::default());
            ensure_line_start(out);
            out.push('\n');
            render_children(node, ctx, out);
            out.push('\n');
            ctx.table = outer;
        }
        StorageTag::TableHead => render_table_head(node, ctx, out),
        StorageTag::TableRow => render_table_row(node, ctx, out),
        StorageTag::Block => {
            render_children(node, ctx, out);
            out.push_str("\n\n");
        }
        StorageTag::Strong => wrap_inline(node, ctx, out, "**"),
        StorageTag::Emphasis => wrap_inline(node, ctx, out, "*"),
        StorageTag::Code => {
            let code = text_content(node);
            if !code.is_empty() {
                out.push_str(&code_span(&code));
            }
        }
        StorageTag::Link => {
            let text = render_to_string(node, ctx);
            match node.attribute("href") {
                Some(href) => out.push_str(&format!(
                    "[{text}]({})",
                    destination(href, node.attribute("title"))
                )),
                None => out.push_str(&text),
            }
        }
        StorageTag::Img => {
            if let Some(src) = node.attribute("src") {
                let alt = escape_inline(node.attribute("alt").unwrap_or(""));
                out.push_str(&format!(
                    "![{alt}]({})",
                    destination(src, node.attribute("title"))
                ));
            }
        }
        StorageTag::LineBreak => out.push_str("  \n"),
        StorageTag::Rule => {
            ensure_line_start(out);
            out.push_str("\n---\n");
        }
        StorageTag::BlockQuote => {
            // Lists inside the quote nest from the quote's own margin.
            let lists = std::mem::take(&mut ctx.lists);
            let inner = render_to_string(node, ctx);
            ctx.lists = lists;
            let quoted: Vec<String> = collapse_blank_lines(&inner)
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect();
            ensure_line_start(out);
            out.push('\n');
            out.push_str(&quoted.join("\n"));
            out.push_str("\n\n");
        }
        StorageTag::Preformatted => write_fenced(out, "", &text_content(node)),
        StorageTag::TableCell | StorageTag::Passthrough => render_children(node, ctx, out),
    }
}

/// Escape a trailing run of `#` that would read as a closing heading sequence.
fn protect_closing_hashes(text: &str) -> String {
    let bare = text.trim_end_matches('#');
    if bare.len() < text.len() && (bare.is_empty() || bare.ends_with(' ')) {
        format!("{bare}\\{}", &text[bare.len()..])
    } else {
        text.to_string()
    }
}

fn wrap_inline(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String, marker: &str) {
    let inner = render_to_string(node, ctx);
    if inner.trim().is_empty() {
        out.push_str(&inner);
        return;
    }
    out.push_str(marker);
    out.push_str(&inner);
    out.push_str(marker);
}

/// Fence long enough not to be closed by backtick runs inside the code.
fn fence_for(code: &str) -> String {
    let longest = code
        .lines()
        .map(|line| line.trim_start().chars().take_while(|c| *c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn write_fenced(out: &mut String, tag: &str, code: &str) {
    let fence = fence_for(code);
    ensure_line_start(out);
    out.push('\n');
    out.push_str(&fence);
    out.push_str(tag);
    out.push('\n');
    out.push_str(code);
    if !code.is_empty() && !code.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
}

fn render_image_macro(node: Node<'_, '_>, ctx: &RenderContext<'_>, out: &mut String) {
    let alt = escape_inline(node.attribute((AC_NS, "alt")).unwrap_or(""));
    match image_source(node) {
        Some(ImageSource::Attachment(filename)) => {
            let filename = utf8_percent_encode(&filename, DESTINATION).to_string();
            out.push_str(&format!(
                "![{alt}]({})",
                local_image_path(ctx.image_dir, &filename)
            ));
        }
        Some(ImageSource::Url(url)) => out.push_str(&format!("![{alt}]({url})")),
        None => log::debug!("skipping image macro without attachment or url"),
    }
}

fn render_list(node: Node<'_, '_>, kind: ListKind, ctx: &mut RenderContext<'_>, out: &mut String) {
    let outermost = ctx.lists.is_empty();
    let start = match kind {
        ListKind::Ordered => node
            .attribute("start")
            .and_then(|start| start.trim().parse().ok())
            .unwrap_or(1),
        ListKind::Unordered => 1,
    };

    ensure_line_start(out);
    if outermost {
        out.push('\n');
    }
    ctx.lists.push(ListFrame {
        kind,
        next_ordinal: start,
        alternate: follows_odd_run(node, kind),
    });
    render_children(node, ctx, out);
    ctx.lists.pop();
    if outermost {
        out.push('\n');
    }
}

/// Whether an odd number of same-kind lists sit directly before this one. Dropped
/// macros do not separate lists.
fn follows_odd_run(node: Node<'_, '_>, kind: ListKind) -> bool {
    let mut run = 0;
    let mut current = node;
    while let Some(previous) = previous_block(current) {
        match StorageTag::of(previous) {
            StorageTag::List(previous_kind) if previous_kind == kind => run += 1,
            StorageTag::UnsupportedMacro => {}
            _ => break,
        }
        current = previous;
    }
    run % 2 == 1
}

/// Previous sibling element, looking past whitespace-only text and comments.
fn previous_block<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    for sibling in std::iter::successors(node.prev_sibling(), |n| n.prev_sibling()) {
        if sibling.is_element() {
            return Some(sibling);
        }
        if sibling.is_text() && sibling.text().is_some_and(|text| !text.trim().is_empty()) {
            return None;
        }
    }
    None
}

/// Writes a list item's own blocks under its content column.
struct ItemBody {
    continuation: String,
    loose: bool,
    on_marker_line: bool,
}

impl ItemBody {
    /// Blocks of a loose item are separated by a blank line, tight ones by none.
    fn break_block(&self, out: &mut String) {
        ensure_line_start(out);
        if self.loose {
            out.push('\n');
        }
    }

    fn flush(&mut self, segment: &mut String, out: &mut String) {
        let body = limit_blank_lines(segment, usize::from(self.loose));
        segment.clear();
        if body.is_empty() {
            return;
        }
        if !self.on_marker_line {
            self.break_block(out);
        }
        for (index, line) in body.split('\n').enumerate() {
            if index > 0 {
                out.push('\n');
            }
            if !line.is_empty() && (index > 0 || !self.on_marker_line) {
                out.push_str(&self.continuation);
            }
            out.push_str(line);
        }
        self.on_marker_line = false;
    }
}

fn render_list_item(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    let indent = "  ".repeat(ctx.lists.len().saturating_sub(1));
    let marker = match ctx.lists.last_mut() {
        Some(frame) => frame.next_marker(),
        None => "- ".to_string(),
    };
    let mut body = ItemBody {
        continuation: " ".repeat(indent.len() + marker.len()),
        loose: node
            .children()
            .any(|child| is_tag(Some(child), StorageTag::Block)),
        on_marker_line: true,
    };

    ensure_line_start(out);
    out.push_str(&indent);
    out.push_str(&marker);

    // Nested lists indent themselves; everything else is buffered and re-indented.
    let mut segment = String::new();
    for child in node.children() {
        if child.is_element() && matches!(StorageTag::of(child), StorageTag::List(_)) {
            body.flush(&mut segment, out);
            if !body.on_marker_line {
                body.break_block(out);
            }
            render_element(child, ctx, out);
            body.on_marker_line = false;
        } else {
            render_node(child, ctx, &mut segment);
        }
    }
    body.flush(&mut segment, out);

    // The blank line separates loose siblings; after the last item it would leak into
    // the parent list.
    ensure_line_start(out);
    if body.loose && has_next_item(node) {
        out.push('\n');
    }
}

fn has_next_item(node: Node<'_, '_>) -> bool {
    std::iter::successors(node.next_sibling(), |n| n.next_sibling())
        .any(|sibling| is_tag(Some(sibling), StorageTag::ListItem))
}

fn render_table_head(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    if let Some(table) = ctx.table.as_mut() {
        table.in_thead = true;
    }
    render_children(node, ctx, out);
    if let Some(table) = ctx.table.as_mut() {
        table.in_thead = false;
        if let Some(alignments) = table.pending_header.take() {
            if !table.header_done {
                out.push_str(&separator_row(&alignments));
                table.header_done = true;
            }
        }
    }
}

fn render_table_row(node: Node<'_, '_>, ctx: &mut RenderContext<'_>, out: &mut String) {
    let cells: Vec<(String, Alignment)> = node
        .children()
        .filter(|child| child.is_element() && StorageTag::of(*child) == StorageTag::TableCell)
        .map(|cell| {
            let text = render_to_string(cell, ctx);
            let text = text.trim().replace('\n', " ").replace('|', "\\|");
            (text, Alignment::of(cell))
        })
        .collect();
    if cells.is_empty() {
        return;
    }

    let texts: Vec<&str> = cells.iter().map(|(text, _)| text.as_str()).collect();
    out.push_str(&format!("| {} |\n", texts.join(" | ")));

    let alignments: Vec<Alignment> = cells.iter().map(|(_, alignment)| *alignment).collect();
    match ctx.table.as_mut() {
        Some(table) if table.in_thead => table.pending_header = Some(alignments),
        Some(table) if !table.header_done => {
            out.push_str(&separator_row(&alignments));
            table.header_done = true;
        }
        _ => {}
    }
}

fn separator_row(alignments: &[Alignment]) -> String {
    let cells: Vec<&str> = alignments.iter().map(|a| a.separator()).collect();
    format!("|{}|\n", cells.join("|"))
}

/// Keep at most one blank line in a row outside fenced code, then trim the ends.
fn collapse_blank_lines(markdown: &str) -> String {
    limit_blank_lines(markdown, 1)
}

fn limit_blank_lines(markdown: &str, max_run: usize) -> String {
    let mut fences = FenceScanner::default();
    let mut blank_run = 0;
    let mut lines = Vec::new();
    for line in markdown.split('\n') {
        if fences.is_prose(line) && line.is_empty() {
            blank_run += 1;
            if blank_run > max_run {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
