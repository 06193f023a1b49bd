//! Replacement of detected spans with redaction tags.

use shroud_core::{Detection, Span, MANUAL_REDACTED_TAG};
use std::ops::Range;

use crate::tokenize::Token;

/// Replace every detection in `text` with its tag.
///
/// Spans are spliced from the highest start offset down so earlier offsets
/// stay valid. Spans outside the text, off a char boundary, or overlapping
/// one already spliced are left alone.
pub fn redact(text: &str, detections: &[Detection]) -> String {
    let mut ordered: Vec<&Detection> = detections.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| a.end.cmp(&b.end)));

    let mut output = text.to_string();
    let mut spliced: Vec<Range<usize>> = Vec::new();
    for d in ordered {
        let range = d.range();
        if range.is_empty()
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            log::warn!("[Redact] span {}..{} is outside the text", range.start, range.end);
            continue;
        }
        if spliced.iter().any(|done| done.overlaps(&range)) {
            log::debug!("[Redact] span {}..{} overlaps a replaced span", range.start, range.end);
            continue;
        }
        output.replace_range(range.clone(), d.kind().tag());
        spliced.push(range);
    }

    log::info!("[Redact] replaced {} of {} spans", spliced.len(), detections.len());
    output
}

/// Tag for a redacted token: its entity tag, or the manual tag when the
/// token carries no kind.
pub fn token_replacement(token: &Token) -> &'static str {
    match token.entity_kind {
        Some(kind) => kind.tag(),
        None => MANUAL_REDACTED_TAG,
    }
}

/// Join tokens back into text, substituting tags for redacted tokens.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        if token.is_redacted {
            output.push_str(token_replacement(token));
        } else {
            output.push_str(&token.text);
        }
    }
    output
}

/// Copy of `tokens` with the token at `index` flipped.
///
/// An index past the end returns the stream unchanged.
pub fn toggle_token(tokens: &[Token], index: usize) -> Vec<Token> {
    let mut next = tokens.to_vec();
    match next.get_mut(index) {
        Some(token) => token.is_redacted = !token.is_redacted,
        None => log::debug!("[Redact] toggle index {} out of range", index),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{tokenize, tokenize_with_auto_detection};
    use shroud_core::scan;

    #[test]
    fn test_redact_replaces_all_kinds() {
        let text = "Email jane@example.com, SSN 123-45-6789, call 555-123-4567.";
        let out = redact(text, &scan(text));
        assert_eq!(
            out,
            "Email [EMAIL_REDACTED], SSN [SSN_REDACTED], call [PHONE_REDACTED]."
        );
    }

    #[test]
    fn test_redact_full_address() {
        let text = "Send it to 123 Main Street, Springfield, IL 62704 please";
        assert_eq!(redact(text, &scan(text)), "Send it to [ADDRESS_REDACTED] please");
    }

    #[test]
    fn test_redact_ignores_bad_spans() {
        let text = "a@b.io";
        let mut d = scan(text).remove(0);
        d.end = 50;
        assert_eq!(redact(text, &[d]), text);
    }

    #[test]
    fn test_redact_skips_overlaps() {
        let text = "x a@b.io y";
        let d = scan(text).remove(0);
        let mut inner = d.clone();
        inner.start += 1;
        let out = redact(text, &[d, inner]);
        assert_eq!(out.matches("[EMAIL_REDACTED]").count(), 1);
    }

    #[test]
    fn test_render_matches_bulk_redaction() {
        let text = "Reach me at jane@example.com or (555) 123-4567 today";
        let detections = scan(text);
        assert_eq!(render_tokens(&tokenize(text, &detections)), redact(text, &detections));
    }

    #[test]
    fn test_manual_tag_for_plain_token() {
        let tokens = tokenize("my secret word", &[]);
        let toggled = toggle_token(&tokens, 2);
        assert_eq!(render_tokens(&toggled), "my [MANUAL_REDACTED] word");
        assert!(!tokens[2].is_redacted);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let tokens = tokenize_with_auto_detection("hello");
        assert_eq!(toggle_token(&tokens, 9), tokens);
    }

    #[test]
    fn test_untoggled_detection_renders_original() {
        let text = "mail a@b.io";
        let tokens = tokenize_with_auto_detection(text);
        let idx = tokens.iter().position(|t| t.entity_kind.is_some()).unwrap();
        assert_eq!(render_tokens(&toggle_token(&tokens, idx)), text);
    }
}
