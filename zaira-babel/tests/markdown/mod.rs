//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ storage conversion.

mod export;
mod frontmatter;
mod import;
