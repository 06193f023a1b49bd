//! Post-redaction verification checks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shroud_core::{mask_snippet, redaction_tags, scan, EntityKind};

static TAG_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Z_]*_REDACTED\]").expect("Failed to compile tag pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyOptions {
    /// Scan the output again for residual entities.
    pub rescan: bool,
    /// Every `[..._REDACTED]` tag must be a known tag.
    pub tag_integrity: bool,
    /// Also report residual address fragments, not only exact PII.
    pub include_addresses: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            rescan: true,
            tag_integrity: true,
            include_addresses: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub ok: bool,
    pub warnings: Vec<String>,
}

/// Check redacted output for leftovers.
pub fn verify_output(redacted: &str, options: &VerifyOptions) -> VerifyResult {
    let mut warnings = Vec::new();

    if options.rescan {
        for d in scan(redacted) {
            let kind = d.kind();
            if kind.is_address() && !options.include_addresses {
                continue;
            }
            warnings.push(format!(
                "residual {} at {}..{}: {}",
                kind,
                d.start,
                d.end,
                mask_snippet(&d.original_text)
            ));
        }
    }

    if options.tag_integrity {
        for m in TAG_SHAPE.find_iter(redacted) {
            if !redaction_tags().any(|tag| tag == m.as_str()) {
                warnings.push(format!("unknown tag {} at {}", m.as_str(), m.start()));
            }
        }
    }

    for w in &warnings {
        log::warn!("[Verify] {}", w);
    }
    VerifyResult {
        ok: warnings.is_empty(),
        warnings,
    }
}

/// Count of known tags in `redacted`, per entity kind.
///
/// Manual tags are not counted.
pub fn count_tags(redacted: &str) -> Vec<(EntityKind, usize)> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| (kind, redacted.matches(kind.tag()).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_text::redact;

    #[test]
    fn test_clean_output_passes() {
        let text = "Contact me at jane@example.com or 555-123-4567";
        let out = redact(text, &scan(text));
        let result = verify_output(&out, &VerifyOptions::default());
        assert!(result.ok, "{:?}", result.warnings);
    }

    #[test]
    fn test_residual_pii_reported() {
        let result = verify_output("SSN 123-45-6789", &VerifyOptions::default());
        assert!(!result.ok);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("residual ssn"));
        assert!(!result.warnings[0].contains("123-45-6789"));
    }

    #[test]
    fn test_addresses_opt_in() {
        let text = "Now in Boise, ID";
        assert!(verify_output(text, &VerifyOptions::default()).ok);

        let strict = VerifyOptions {
            include_addresses: true,
            ..Default::default()
        };
        assert!(!verify_output(text, &strict).ok);
    }

    #[test]
    fn test_unknown_tag_reported() {
        let result = verify_output("x [NAME_REDACTED] y [EMAIL_REDACTED]", &VerifyOptions::default());
        assert_eq!(result.warnings, vec!["unknown tag [NAME_REDACTED] at 2".to_string()]);
    }

    #[test]
    fn test_checks_can_be_disabled() {
        let options = VerifyOptions {
            rescan: false,
            tag_integrity: false,
            include_addresses: false,
        };
        assert!(verify_output("[NAME_REDACTED] a@b.io", &options).ok);
    }

    #[test]
    fn test_count_tags() {
        let counts = count_tags("[EMAIL_REDACTED] [EMAIL_REDACTED] [PO_BOX_REDACTED] [MANUAL_REDACTED]");
        assert_eq!(counts, vec![(EntityKind::Email, 2), (EntityKind::PoBox, 1)]);
    }

    #[test]
    fn test_options_from_json() {
        let options: VerifyOptions = serde_json::from_str(r#"{"includeAddresses": true}"#).unwrap();
        assert!(options.rescan && options.include_addresses);
    }
}
