//! Helpers shared by both conversion directions.

pub mod images;
pub mod languages;
