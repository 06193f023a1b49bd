//! Token streams over detected text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shroud_core::{scan, sort_by_position, Detection, EntityKind, Span};
use shroud_rules::default_library;

static RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+|\S+").expect("Failed to compile run pattern"));

/// One unit of a token stream.
///
/// A token is either a whole detection or a run of whitespace / non-whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub index: u32,
    pub is_redacted: bool,
    pub is_auto_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_kind: Option<EntityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Token {
    fn plain(text: &str, index: u32) -> Self {
        Self {
            text: text.to_string(),
            index,
            is_redacted: false,
            is_auto_detected: false,
            entity_kind: None,
            confidence: None,
        }
    }

    fn detected(d: &Detection, index: u32) -> Self {
        Self {
            text: d.original_text.clone(),
            index,
            is_redacted: true,
            is_auto_detected: true,
            entity_kind: Some(d.kind()),
            confidence: Some(d.confidence),
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Split `text` into tokens, one atomic token per detection.
///
/// Joining every token's `text` reproduces the input. Detections that
/// overlap an earlier one, fall outside the text or cut a UTF-8 sequence
/// are ignored.
pub fn tokenize(text: &str, detections: &[Detection]) -> Vec<Token> {
    let mut ordered = detections.to_vec();
    sort_by_position(&mut ordered);

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for d in &ordered {
        if d.start < cursor
            || d.is_empty()
            || d.end > text.len()
            || !text.is_char_boundary(d.start)
            || !text.is_char_boundary(d.end)
        {
            log::debug!("[Tokenize] skipping detection {}..{}", d.start, d.end);
            continue;
        }
        push_runs(&mut tokens, &text[cursor..d.start]);
        let index = next_index(&tokens);
        tokens.push(Token::detected(d, index));
        cursor = d.end;
    }
    push_runs(&mut tokens, &text[cursor..]);
    tokens
}

/// Scan `text`, tokenize it, then flag leftover tokens that still look
/// like an email, phone number or SSN.
pub fn tokenize_with_auto_detection(text: &str) -> Vec<Token> {
    let detections = scan(text);
    let mut tokens = tokenize(text, &detections);

    for token in tokens.iter_mut().filter(|t| t.entity_kind.is_none()) {
        if let Some(kind) = shape_of(&token.text) {
            log::debug!("[Tokenize] token {} flagged as {}", token.index, kind);
            token.is_redacted = true;
            token.is_auto_detected = true;
            token.entity_kind = Some(kind);
            token.confidence = Some(1.0);
        }
    }
    tokens
}

fn shape_of(text: &str) -> Option<EntityKind> {
    let lib = default_library();
    if lib.email.is_match(text) {
        Some(EntityKind::Email)
    } else if lib.ssn.is_match(text) {
        Some(EntityKind::Ssn)
    } else if lib.phone.is_match(text) {
        Some(EntityKind::Phone)
    } else {
        None
    }
}

fn push_runs(tokens: &mut Vec<Token>, gap: &str) {
    for run in RUNS.find_iter(gap) {
        let index = next_index(tokens);
        tokens.push(Token::plain(run.as_str(), index));
    }
}

fn next_index(tokens: &[Token]) -> u32 {
    tokens.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_plain_text_runs() {
        let tokens = tokenize("a  b\tc ", &[]);
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "  ", "b", "\t", "c", " "]);
        assert!(tokens.iter().all(|t| !t.is_redacted));
        assert_eq!(tokens[3].index, 3);
        assert!(tokens[1].is_whitespace());
    }

    #[test]
    fn test_detection_is_atomic() {
        let text = "Mail jane@example.com now";
        let detections = scan(text);
        let tokens = tokenize(text, &detections);
        assert_eq!(joined(&tokens), text);

        let email = tokens.iter().find(|t| t.entity_kind.is_some()).unwrap();
        assert_eq!(email.text, "jane@example.com");
        assert!(email.is_redacted && email.is_auto_detected);
        assert_eq!(email.confidence, Some(1.0));
    }

    #[test]
    fn test_address_spans_whitespace() {
        let text = "at 12 Oak Street today";
        let tokens = tokenize(text, &scan(text));
        assert_eq!(joined(&tokens), text);
        assert!(tokens.iter().any(|t| t.text == "12 Oak Street"));
    }

    #[test]
    fn test_invalid_detections_skipped() {
        let text = "héllo world";
        let mut bad = scan("jane@example.com")[0].clone();
        bad.start = 1;
        bad.end = 2;
        let tokens = tokenize(text, &[bad]);
        assert_eq!(joined(&tokens), text);
        assert!(tokens.iter().all(|t| t.entity_kind.is_none()));
    }

    #[test]
    fn test_overlapping_detections_keep_first() {
        let text = "reach a@b.io";
        let first = scan(text).remove(0);
        let mut second = first.clone();
        second.start += 2;
        let tokens = tokenize(text, &[second, first]);
        assert_eq!(joined(&tokens), text);
        assert_eq!(tokens.iter().filter(|t| t.entity_kind.is_some()).count(), 1);
    }

    #[test]
    fn test_auto_detection_flags_shapes() {
        let tokens = tokenize_with_auto_detection("id 123-45-6789 ok");
        let ssn = tokens.iter().find(|t| t.text == "123-45-6789").unwrap();
        assert_eq!(ssn.entity_kind, Some(EntityKind::Ssn));
        assert!(ssn.is_redacted);
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(shape_of("x@y.org,"), Some(EntityKind::Email));
        assert_eq!(shape_of("(555)"), None);
        assert_eq!(shape_of("5551234567"), Some(EntityKind::Phone));
        assert_eq!(shape_of("hello"), None);
    }
}
