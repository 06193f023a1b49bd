//! Confidence scoring.
//!
//! Each kind starts from a base value and gains a fixed bonus for every
//! populated component. A bare PO box outranks a bare street fragment.

use crate::detection::{AddressParts, Components, InternationalParts, PoBoxParts};

/// Email, phone and SSN are exact shapes with no graduated components.
const EXACT_PII_BASE: f64 = 1.0;

const FULL_ADDRESS_BASE: f64 = 0.60;
const PO_BOX_BASE: f64 = 0.70;
const PARTIAL_ADDRESS_BASE: f64 = 0.30;
const INTERNATIONAL_BASE: f64 = 0.40;

/// Score in `[0, 1]`, rounded to two decimals.
pub fn score(components: &Components) -> f64 {
    let raw = match components {
        Components::Email | Components::Phone | Components::Ssn => EXACT_PII_BASE,
        Components::FullAddress(parts) => FULL_ADDRESS_BASE + full_address_bonus(parts),
        Components::PartialAddress(parts) => PARTIAL_ADDRESS_BASE + partial_address_bonus(parts),
        Components::PoBox(parts) => PO_BOX_BASE + po_box_bonus(parts),
        Components::InternationalAddress(parts) => INTERNATIONAL_BASE + international_bonus(parts),
    };
    round2(raw.clamp(0.0, 1.0))
}

fn full_address_bonus(parts: &AddressParts) -> f64 {
    bonus(&parts.street_number, 0.10)
        + bonus(&parts.street_name, 0.10)
        + bonus(&parts.street_type, 0.10)
        + bonus(&parts.city, 0.05)
        + bonus(&parts.state, 0.05)
        + bonus(&parts.zip_code, 0.10)
}

fn partial_address_bonus(parts: &AddressParts) -> f64 {
    bonus(&parts.street_number, 0.20)
        + bonus(&parts.street_name, 0.10)
        + bonus(&parts.street_type, 0.10)
        + bonus(&parts.city, 0.10)
        + bonus(&parts.state, 0.10)
        + bonus(&parts.zip_code, 0.10)
}

fn po_box_bonus(parts: &PoBoxParts) -> f64 {
    bonus(&parts.city, 0.10) + bonus(&parts.state, 0.05) + bonus(&parts.zip_code, 0.05)
}

fn international_bonus(parts: &InternationalParts) -> f64 {
    let country = if parts.country.trim().is_empty() { 0.0 } else { 0.10 };
    bonus(&parts.postal_code, 0.30) + country
}

fn bonus(field: &Option<String>, weight: f64) -> f64 {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => weight,
        _ => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_full_address_all_bonuses_clamped() {
        let parts = AddressParts {
            street_number: some("123"),
            street_name: some("Main"),
            street_type: some("Street"),
            unit: None,
            city: some("Springfield"),
            state: some("IL"),
            zip_code: some("62704"),
        };
        assert_eq!(score(&Components::FullAddress(parts)), 1.0);
    }

    #[test]
    fn test_po_box_complete_is_exactly_point_nine() {
        let parts = PoBoxParts {
            po_box: "4521".into(),
            city: some("Reno"),
            state: some("NV"),
            zip_code: some("89501"),
        };
        assert_eq!(score(&Components::PoBox(parts)), 0.9);
    }

    #[test]
    fn test_bare_po_box_beats_bare_street() {
        let po_box = score(&Components::PoBox(PoBoxParts {
            po_box: "1".into(),
            ..Default::default()
        }));
        let street = score(&Components::PartialAddress(AddressParts {
            street_name: some("Main"),
            ..Default::default()
        }));
        assert_eq!(po_box, 0.7);
        assert_eq!(street, 0.4);
        assert!(po_box > street);
    }

    #[test]
    fn test_partial_street_fragment() {
        let parts = AddressParts {
            street_number: some("12"),
            street_name: some("Oak"),
            street_type: some("Street"),
            ..Default::default()
        };
        assert_eq!(score(&Components::PartialAddress(parts)), 0.7);
    }

    #[test]
    fn test_blank_fields_earn_nothing() {
        let parts = AddressParts {
            city: some("   "),
            ..Default::default()
        };
        assert_eq!(score(&Components::PartialAddress(parts)), 0.3);
    }

    #[test]
    fn test_international_scores() {
        let with_postcode = InternationalParts {
            country: "United Kingdom".into(),
            postal_code: some("SW1A 1AA"),
            has_address_indicators: true,
        };
        assert_eq!(score(&Components::InternationalAddress(with_postcode)), 0.8);

        let bare = InternationalParts {
            country: "Canada".into(),
            postal_code: None,
            has_address_indicators: true,
        };
        assert_eq!(score(&Components::InternationalAddress(bare)), 0.5);
    }

    #[test]
    fn test_exact_pii_is_certain() {
        assert_eq!(score(&Components::Email), 1.0);
        assert_eq!(score(&Components::Phone), 1.0);
        assert_eq!(score(&Components::Ssn), 1.0);
    }
}
