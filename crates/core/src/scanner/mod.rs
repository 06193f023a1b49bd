//! Entity scanner.
//!
//! Runs every enabled pattern family over the whole text, scores the raw
//! candidates and resolves overlaps between families.
//!
//! Order of evidence:
//! - full US addresses, PO boxes, international addresses and the exact
//!   email / phone / SSN shapes are resolved against each other first
//! - partial addresses only survive on spans none of those survivors claim

mod address;
mod pii;

use shroud_rules::{default_library, PatternLibrary};
use std::ops::Range;

use crate::config::EngineConfig;
use crate::detection::{Detection, EntityKind};
use crate::resolve::{resolve, uncontested};
use crate::{mask_snippet, CoreError, Result};

/// Scanner over one pattern library with one configuration.
///
/// Holds no per-scan state; `scan` can be called concurrently.
#[derive(Debug, Clone)]
pub struct Scanner<'lib> {
    config: EngineConfig,
    library: &'lib PatternLibrary,
}

impl Scanner<'static> {
    /// Scanner over the built-in pattern library.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Scanner::with_library(config, default_library())
    }
}

impl Default for Scanner<'static> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            library: default_library(),
        }
    }
}

impl<'lib> Scanner<'lib> {
    pub fn with_library(config: EngineConfig, library: &'lib PatternLibrary) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, library })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &'lib PatternLibrary {
        self.library
    }

    /// Detect all entities, rejecting a missing input.
    ///
    /// An empty string is valid input and yields no detections.
    pub fn detect_all(&self, text: Option<&str>) -> Result<Vec<Detection>> {
        let text = text.ok_or(CoreError::InvalidInput("text is missing"))?;
        Ok(self.scan(text))
    }

    /// Scan `text` and return disjoint detections, highest confidence first.
    pub fn scan(&self, text: &str) -> Vec<Detection> {
        if text.is_empty() {
            return Vec::new();
        }

        let ctx = ScanContext {
            text,
            library: self.library,
            config: &self.config,
            blocked: address::disambiguation_spans(self.library, text, self.cap()),
        };

        let mut primary = Vec::new();
        if self.config.is_enabled(EntityKind::FullAddress) {
            primary.extend(address::scan_full(&ctx));
        }
        if self.config.is_enabled(EntityKind::PoBox) {
            primary.extend(address::scan_po_box(&ctx));
        }
        if self.config.is_enabled(EntityKind::InternationalAddress) {
            primary.extend(address::scan_international(&ctx));
        }

        if self.config.is_enabled(EntityKind::Email) {
            primary.extend(pii::scan_email(&ctx));
        }
        if self.config.is_enabled(EntityKind::Phone) {
            primary.extend(pii::scan_phone(&ctx));
        }
        if self.config.is_enabled(EntityKind::Ssn) {
            primary.extend(pii::scan_ssn(&ctx));
        }

        // Partials only compete with primary candidates that survived.
        let mut candidates = resolve(primary);
        if self.config.is_enabled(EntityKind::PartialAddress) {
            let partial = uncontested(address::scan_partial(&ctx), &candidates);
            candidates.extend(partial);
        }

        let detections = resolve(candidates);
        for d in &detections {
            log::debug!(
                "[Scanner] {} {}..{} {:?} ({:.2})",
                d.kind(),
                d.start,
                d.end,
                mask_snippet(&d.original_text),
                d.confidence
            );
        }
        detections
    }

    fn cap(&self) -> usize {
        self.config.max_matches_per_family
    }
}

/// Borrowed inputs shared by all families during one scan.
pub(crate) struct ScanContext<'a> {
    pub text: &'a str,
    pub library: &'a PatternLibrary,
    pub config: &'a EngineConfig,
    /// Phone, SSN and date shapes; address candidates touching them are dropped.
    pub blocked: Vec<Range<usize>>,
}

impl ScanContext<'_> {
    pub fn cap(&self) -> usize {
        self.config.max_matches_per_family
    }
}

/// Take at most `cap` items from a match iterator.
///
/// Exceeding the cap truncates the family silently apart from a debug log.
pub(crate) fn capped<I: Iterator>(
    iter: I,
    cap: usize,
    family: &'static str,
) -> impl Iterator<Item = I::Item> {
    let mut taken = 0usize;
    iter.take_while(move |_| {
        taken += 1;
        if taken > cap {
            log::debug!("[Scanner] {} stopped at the {} match cap", family, cap);
            return false;
        }
        true
    })
}

/// Byte offset `chars` characters before `idx`, clamped to the start.
pub(crate) fn chars_back(text: &str, idx: usize, chars: usize) -> usize {
    if chars == 0 {
        return idx;
    }
    text[..idx]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(idx)
}
