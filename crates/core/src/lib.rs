//! Core detection for redaction tasks.
//!
//! Finds emails, phone numbers, SSNs and postal addresses in free text and
//! returns scored, non-overlapping detections.

pub mod config;
pub mod detection;
pub mod resolve;
pub mod scanner;
pub mod scoring;

pub use config::EngineConfig;
pub use detection::{
    redaction_tags, AddressParts, Components, Detection, EntityKind, InternationalParts,
    PoBoxParts, Span, MANUAL_REDACTED_TAG,
};
pub use resolve::{resolve, sort_by_confidence, sort_by_position};
pub use scanner::Scanner;

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

static DEFAULT_SCANNER: Lazy<Scanner<'static>> = Lazy::new(Scanner::default);

/// Detect every entity in `text` with the default configuration.
///
/// `None` is rejected with [`CoreError::InvalidInput`]; an empty string
/// returns an empty list.
pub fn detect_all(text: Option<&str>) -> Result<Vec<Detection>> {
    DEFAULT_SCANNER.detect_all(text)
}

/// Infallible form of [`detect_all`] for text that is known to exist.
pub fn scan(text: &str) -> Vec<Detection> {
    DEFAULT_SCANNER.scan(text)
}

/// Number of detections per kind.
pub fn summarize(detections: &[Detection]) -> BTreeMap<EntityKind, usize> {
    let mut counts = BTreeMap::new();
    for d in detections {
        *counts.entry(d.kind()).or_insert(0) += 1;
    }
    counts
}

/// Mask matched text for logs: keep a few chars at each end.
pub fn mask_snippet(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    if len <= 4 {
        "*".repeat(len)
    } else {
        let visible = 4.min(len / 3);
        let prefix: String = chars[..visible].iter().collect();
        let suffix: String = chars[len - visible..].iter().collect();
        format!("{}****{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_snippet() {
        assert_eq!(mask_snippet("abc"), "***");
        assert_eq!(mask_snippet("jane@example.com"), "jane****.com");
        assert_eq!(mask_snippet("12345"), "1****5");
    }

    #[test]
    fn test_summarize_counts_kinds() {
        let found = scan("a@b.io, c@d.io, 555-123-4567");
        let summary = summarize(&found);
        assert_eq!(summary.get(&EntityKind::Email), Some(&2));
        assert_eq!(summary.get(&EntityKind::Phone), Some(&1));
        assert_eq!(summary.get(&EntityKind::Ssn), None);
    }

    #[test]
    fn test_detect_all_none() {
        assert!(matches!(detect_all(None), Err(CoreError::InvalidInput(_))));
    }
}
