//! Detection data model.
//!
//! A `Detection` is one scored PII or address finding. Offsets are byte
//! offsets into the scanned `&str` and always fall on char boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::scoring;

/// Replacement for a token the user redacted by hand.
pub const MANUAL_REDACTED_TAG: &str = "[MANUAL_REDACTED]";

/// Kind of entity a detection represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Email,
    Phone,
    Ssn,
    FullAddress,
    PartialAddress,
    PoBox,
    InternationalAddress,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Email,
        EntityKind::Phone,
        EntityKind::Ssn,
        EntityKind::FullAddress,
        EntityKind::PartialAddress,
        EntityKind::PoBox,
        EntityKind::InternationalAddress,
    ];

    /// Replacement tag written in place of a redacted entity of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Email => "[EMAIL_REDACTED]",
            EntityKind::Phone => "[PHONE_REDACTED]",
            EntityKind::Ssn => "[SSN_REDACTED]",
            EntityKind::FullAddress => "[ADDRESS_REDACTED]",
            EntityKind::PartialAddress => "[PARTIAL_ADDRESS_REDACTED]",
            EntityKind::PoBox => "[PO_BOX_REDACTED]",
            EntityKind::InternationalAddress => "[INTERNATIONAL_ADDRESS_REDACTED]",
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(
            self,
            EntityKind::FullAddress
                | EntityKind::PartialAddress
                | EntityKind::PoBox
                | EntityKind::InternationalAddress
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Email => "email",
            EntityKind::Phone => "phone",
            EntityKind::Ssn => "ssn",
            EntityKind::FullAddress => "full_address",
            EntityKind::PartialAddress => "partial_address",
            EntityKind::PoBox => "po_box",
            EntityKind::InternationalAddress => "international_address",
        };
        write!(f, "{}", name)
    }
}

/// All fixed replacement tags, including the manual one.
pub fn redaction_tags() -> impl Iterator<Item = &'static str> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| kind.tag())
        .chain(std::iter::once(MANUAL_REDACTED_TAG))
}

// ============================================================================
// Components
// ============================================================================

/// Fields of a US street address. Used by both full and partial matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    /// Normalized, e.g. `St` is stored as `Street`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoBoxParts {
    pub po_box: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternationalParts {
    /// Canonical country name, e.g. `UK` is stored as `United Kingdom`.
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub has_address_indicators: bool,
}

/// Per-kind component fields. The variant determines the detection's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "parts")]
pub enum Components {
    Email,
    Phone,
    Ssn,
    FullAddress(AddressParts),
    PartialAddress(AddressParts),
    PoBox(PoBoxParts),
    InternationalAddress(InternationalParts),
}

impl Components {
    pub fn kind(&self) -> EntityKind {
        match self {
            Components::Email => EntityKind::Email,
            Components::Phone => EntityKind::Phone,
            Components::Ssn => EntityKind::Ssn,
            Components::FullAddress(_) => EntityKind::FullAddress,
            Components::PartialAddress(_) => EntityKind::PartialAddress,
            Components::PoBox(_) => EntityKind::PoBox,
            Components::InternationalAddress(_) => EntityKind::InternationalAddress,
        }
    }

    /// Street address fields, for full and partial addresses.
    pub fn address(&self) -> Option<&AddressParts> {
        match self {
            Components::FullAddress(parts) | Components::PartialAddress(parts) => Some(parts),
            _ => None,
        }
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Half-open `[start, end)` byte range.
pub trait Span {
    fn start(&self) -> usize;
    fn end(&self) -> usize;

    fn len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn overlaps<S: Span + ?Sized>(&self, other: &S) -> bool {
        !(self.end() <= other.start() || other.end() <= self.start())
    }
}

impl Span for Range<usize> {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

// ============================================================================
// Detection
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub components: Components,
    pub original_text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

impl Detection {
    /// Build a detection for `range` of `source`, scoring it from its components.
    ///
    /// `range` must lie on char boundaries of `source`.
    pub fn from_match(source: &str, range: Range<usize>, components: Components) -> Self {
        let confidence = scoring::score(&components);
        Self {
            original_text: source[range.clone()].to_string(),
            start: range.start,
            end: range.end,
            components,
            confidence,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.components.kind()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Span for Detection {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_overlap_is_half_open() {
        assert!((0..5).overlaps(&(4..6)));
        assert!(!(0..5).overlaps(&(5..6)));
        assert!(!(5..6).overlaps(&(0..5)));
        assert!((2..3).overlaps(&(0..10)));
    }

    #[test]
    fn test_kind_follows_components() {
        let parts = AddressParts {
            city: Some("Reno".into()),
            ..Default::default()
        };
        assert_eq!(
            Components::PartialAddress(parts.clone()).kind(),
            EntityKind::PartialAddress
        );
        assert_eq!(Components::FullAddress(parts).kind(), EntityKind::FullAddress);
        assert_eq!(Components::Email.kind(), EntityKind::Email);
    }

    #[test]
    fn test_tags_have_no_digits_or_at_signs() {
        for tag in redaction_tags() {
            assert!(tag.starts_with('[') && tag.ends_with("_REDACTED]"));
            assert!(!tag.chars().any(|c| c.is_ascii_digit() || c == '@'));
        }
        assert_eq!(redaction_tags().count(), 8);
    }

    #[test]
    fn test_from_match_slices_source() {
        let text = "mail jane@example.com now";
        let d = Detection::from_match(text, 5..21, Components::Email);
        assert_eq!(d.original_text, "jane@example.com");
        assert_eq!(d.kind(), EntityKind::Email);
        assert_eq!(d.len(), 16);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn test_serialized_shape() {
        let d = Detection::from_match("PO Box 9", 0..8, Components::PoBox(PoBoxParts {
            po_box: "9".into(),
            ..Default::default()
        }));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["components"]["kind"], "PoBox");
        assert_eq!(json["components"]["parts"]["poBox"], "9");
        assert_eq!(json["originalText"], "PO Box 9");
    }
}
