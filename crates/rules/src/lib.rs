//! Pattern library for PII and postal address detection.
//!
//! All lookup tables (street types, states, countries, unit designators,
//! prepositions) live in `data/patterns.json` and are compiled into regular
//! expressions once. Scanners only ever borrow the compiled patterns, so no
//! matcher carries state between calls.

mod library;

pub use library::{PatternLibrary, PatternTables};

use once_cell::sync::Lazy;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("table `{0}` must not be empty")]
    EmptyTable(&'static str),
}

static DEFAULT_LIBRARY: Lazy<PatternLibrary> = Lazy::new(|| {
    let json_str = include_str!("../data/patterns.json");
    PatternLibrary::from_json(json_str).expect("Failed to build patterns.json")
});

/// The built-in pattern library, compiled on first use.
pub fn default_library() -> &'static PatternLibrary {
    &DEFAULT_LIBRARY
}
