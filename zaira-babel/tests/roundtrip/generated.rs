//! Property tests over generated documents.

use crate::common::{to_markdown, to_storage};
use proptest::prelude::*;
use zaira_babel::convert_images_to_attachments;

#[derive(Debug, Clone)]
enum Block {
    Heading(usize, String),
    Paragraph(String),
    List(String),
    Code(&'static str, Vec<String>),
    Toc,
}

impl Block {
    fn render(&self) -> String {
        match self {
            Block::Heading(level, text) => format!("{} {text}", "#".repeat(*level)),
            Block::Paragraph(text) => text.clone(),
            Block::List(list) => list.clone(),
            Block::Code(tag, lines) => format!("```{tag}\n{}\n```", lines.join("\n")),
            Block::Toc => "[TOC]".to_string(),
        }
    }
}

fn plain_word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Words sometimes carry markup characters that must come back literally.
fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => plain_word(),
        1 => "[a-z]{1,5}[*_#&.!?:+\\\\\\[\\]-]",
        1 => "[*_#&!+\\\\\\[\\]-][a-z]{1,5}",
    ]
}

fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..max).prop_map(|words| words.join(" "))
}

fn plain_words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(plain_word(), 1..max).prop_map(|words| words.join(" "))
}

fn inline_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        6 => word(),
        2 => word().prop_map(|w| format!("**{w}**")),
        2 => word().prop_map(|w| format!("*{w}*")),
        2 => word().prop_map(|w| format!("`{w}`")),
        2 => (word(), plain_word()).prop_map(|(text, host)| format!("[{text}](https://{host}.org)")),
        1 => (word(), plain_word(), plain_words(3))
            .prop_map(|(text, host, title)| format!("[{text}](https://{host}.org \"{title}\")")),
        1 => (plain_words(3), plain_word(), plain_words(3))
            .prop_map(|(alt, host, title)| format!("![{alt}](https://{host}.org/i.png \"{title}\")")),
    ];
    prop::collection::vec(piece, 1..8).prop_map(|pieces| pieces.join(" "))
}

/// A list item: its text, an optional second paragraph, optional fenced code and
/// nested children.
type Item = (String, Option<String>, Option<Vec<String>>, Vec<String>);

fn item() -> impl Strategy<Value = Item> {
    (
        inline_text(),
        prop::option::weighted(0.2, words(4)),
        prop::option::weighted(0.2, prop::collection::vec("[a-z]{1,8}( = [0-9])?", 1..3)),
        prop::collection::vec(words(4), 0..3),
    )
}

fn list() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop::sample::select(vec!['-', '*', '+']),
        prop::sample::select(vec!['.', ')']),
        1u32..5,
        prop::collection::vec(item(), 1..4),
    )
        .prop_map(|(ordered, bullet, delimiter, start, items)| {
            let mut lines = Vec::new();
            let mut ordinal = start;
            for (text, paragraph, code, children) in items {
                let marker = if ordered {
                    let marker = format!("{ordinal}{delimiter} ");
                    ordinal += 1;
                    marker
                } else {
                    format!("{bullet} ")
                };
                let pad = " ".repeat(marker.len());
                lines.push(format!("{marker}{text}"));
                if let Some(paragraph) = paragraph {
                    lines.push(String::new());
                    lines.push(format!("{pad}{paragraph}"));
                }
                if let Some(code) = code {
                    lines.push(String::new());
                    lines.push(format!("{pad}```"));
                    lines.extend(code.iter().map(|line| format!("{pad}{line}")));
                    lines.push(format!("{pad}```"));
                }
                lines.extend(children.into_iter().map(|child| format!("  - {child}")));
            }
            lines.join("\n")
        })
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        1 => (1usize..=6, words(5)).prop_map(|(level, text)| Block::Heading(level, text)),
        1 => inline_text().prop_map(Block::Paragraph),
        2 => list().prop_map(Block::List),
        1 => (
            prop::sample::select(vec!["", "py", "js", "sh", "rust", "html"]),
            prop::collection::vec("[a-z]{1,10}( [a-z]{1,10})?", 1..4)
        )
            .prop_map(|(tag, lines)| Block::Code(tag, lines)),
        1 => Just(Block::Toc),
    ]
}

/// Blocks joined by blank lines. Back-to-back lists either merge or stay apart,
/// depending on their markers.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..8).prop_map(|blocks| {
        blocks
            .iter()
            .map(Block::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn storage_round_trip_is_stable(doc in document()) {
        let first = to_storage(&doc);
        let second = to_storage(&to_markdown(&first));
        prop_assert_eq!(second, first);
    }

    #[test]
    fn attachment_rewrite_is_idempotent(
        alt in "[a-z]{0,6}",
        path in "(\\./)?[a-z]{1,5}(/[a-z]{1,5}){0,2}\\.png",
    ) {
        let md = format!("![{alt}]({path})");
        let once = convert_images_to_attachments(&md);
        prop_assert_eq!(convert_images_to_attachments(&once), once.clone());
        prop_assert!(once.contains("(attachment:"));
    }
}
