//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the storage format and text representations.

pub mod markdown;
pub mod storage;

pub use markdown::MarkdownFormat;
pub use storage::StorageFormat;
