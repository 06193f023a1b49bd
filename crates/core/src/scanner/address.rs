//! Postal address families: full US, PO box, partial US and international.

use regex::Captures;
use shroud_rules::PatternLibrary;
use std::ops::Range;

use super::{capped, chars_back, ScanContext};
use crate::detection::{
    AddressParts, Components, Detection, InternationalParts, PoBoxParts,
};
use crate::resolve::overlaps_any;

/// Spans of phone, SSN and date shapes anywhere in the text.
///
/// A street number that is really part of `555-123-4567` or `03/04/2021`
/// must not start an address.
pub(super) fn disambiguation_spans(
    library: &PatternLibrary,
    text: &str,
    cap: usize,
) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    for (family, re) in [
        ("phone", &library.phone),
        ("local_phone", &library.local_phone),
        ("ssn", &library.ssn),
        ("date", &library.date),
    ] {
        spans.extend(capped(re.find_iter(text), cap, family).map(|m| m.range()));
    }
    spans
}

fn capture(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// Full US address
// ============================================================================

pub(super) fn scan_full(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let lib = ctx.library;
    let mut out = Vec::new();

    for caps in capped(lib.full_address.captures_iter(ctx.text), ctx.cap(), "full_address") {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps_any(&whole.range(), &ctx.blocked) {
            continue;
        }
        let parts = AddressParts {
            street_number: capture(&caps, "number"),
            street_name: capture(&caps, "name"),
            street_type: caps
                .name("type")
                .map(|m| lib.normalize_street_type(m.as_str())),
            unit: capture(&caps, "unit"),
            city: capture(&caps, "city"),
            state: capture(&caps, "state"),
            zip_code: capture(&caps, "zip"),
        };
        out.push(Detection::from_match(
            ctx.text,
            whole.range(),
            Components::FullAddress(parts),
        ));
    }

    out
}

// ============================================================================
// PO box
// ============================================================================

pub(super) fn scan_po_box(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let lib = ctx.library;
    let mut out = Vec::new();

    for caps in capped(lib.po_box.captures_iter(ctx.text), ctx.cap(), "po_box") {
        let Some(whole) = caps.get(0) else { continue };
        let mut parts = PoBoxParts {
            po_box: capture(&caps, "number").unwrap_or_default(),
            ..Default::default()
        };
        let mut end = whole.end();

        // Best effort: extend over a trailing "City, ST 12345".
        if let Some(tail) = lib.po_box_locality.captures(&ctx.text[end..]) {
            if let Some(m) = tail.get(0) {
                parts.city = capture(&tail, "city");
                parts.state = capture(&tail, "state");
                parts.zip_code = capture(&tail, "zip");
                end += m.end();
            }
        }

        let range = whole.start()..end;
        if overlaps_any(&range, &ctx.blocked) {
            continue;
        }
        out.push(Detection::from_match(ctx.text, range, Components::PoBox(parts)));
    }

    out
}

// ============================================================================
// International
// ============================================================================

pub(super) fn scan_international(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let lib = ctx.library;
    let text = ctx.text;
    let mut out = Vec::new();
    // "Mexico" in "New Mexico" is a US state, not a country.
    let state_names: Vec<Range<usize>> =
        lib.state_name.find_iter(text).map(|m| m.range()).collect();

    for mention in capped(lib.country.find_iter(text), ctx.cap(), "international") {
        if overlaps_any(&mention.range(), &state_names) {
            continue;
        }
        let window_start = chars_back(text, mention.start(), ctx.config.international_window);
        let window = &text[window_start..mention.start()];

        let postal_code = lib
            .uk_postcode
            .find(window)
            .or_else(|| lib.ca_postcode.find(window))
            .map(|m| m.as_str().to_string());
        let Some(start) = first_indicator(ctx, window_start, window) else {
            continue;
        };

        let country = lib
            .canonical_country(mention.as_str())
            .unwrap_or(mention.as_str())
            .to_string();
        let parts = InternationalParts {
            country,
            postal_code,
            has_address_indicators: true,
        };
        out.push(Detection::from_match(
            text,
            start..mention.end(),
            Components::InternationalAddress(parts),
        ));
    }

    out
}

/// Byte offset of the earliest postcode, street number or street-type word
/// in the window, ignoring digits that belong to a phone, SSN or date.
///
/// The international span starts there, so text ahead of the address stays
/// out of it.
fn first_indicator(ctx: &ScanContext<'_>, window_start: usize, window: &str) -> Option<usize> {
    let lib = ctx.library;
    [
        &lib.uk_postcode,
        &lib.ca_postcode,
        &lib.street_number,
        &lib.street_type_word,
    ]
    .into_iter()
    .filter_map(|re| {
        re.find_iter(window)
            .map(|m| window_start + m.start()..window_start + m.end())
            .find(|range| !overlaps_any(range, &ctx.blocked))
            .map(|range| range.start)
    })
    .min()
}

// ============================================================================
// Partial US address
// ============================================================================

/// Street fragments, `City, ST`, `City, State` and cued ZIP codes.
pub(super) fn scan_partial(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let mut out = scan_street_fragments(ctx);
    out.extend(scan_city_state(ctx, &ctx.library.city_state_abbrev, "city_state_abbrev"));
    out.extend(scan_city_state(ctx, &ctx.library.city_state_full, "city_state_full"));
    out.extend(scan_cued_zip(ctx));
    out
}

fn scan_street_fragments(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let lib = ctx.library;
    let mut out = Vec::new();

    for caps in capped(lib.partial_street.captures_iter(ctx.text), ctx.cap(), "partial_street") {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps_any(&whole.range(), &ctx.blocked) {
            continue;
        }
        let parts = AddressParts {
            street_number: capture(&caps, "number"),
            street_name: capture(&caps, "name"),
            street_type: caps
                .name("type")
                .map(|m| lib.normalize_street_type(m.as_str())),
            ..Default::default()
        };
        out.push(Detection::from_match(
            ctx.text,
            whole.range(),
            Components::PartialAddress(parts),
        ));
    }

    out
}

fn scan_city_state(
    ctx: &ScanContext<'_>,
    re: &regex::Regex,
    family: &'static str,
) -> Vec<Detection> {
    let mut out = Vec::new();

    for caps in capped(re.captures_iter(ctx.text), ctx.cap(), family) {
        let (Some(whole), Some(city)) = (caps.get(0), caps.name("city")) else {
            continue;
        };
        let Some((offset, kept)) = strip_leading_words(ctx.library, city.as_str()) else {
            continue;
        };
        let range = city.start() + offset..whole.end();
        if overlaps_any(&range, &ctx.blocked) {
            continue;
        }
        let state = capture(&caps, "state");
        let zip_code = capture(&caps, "zip");
        // "Jane Doe, MD" is a credential unless a ZIP follows.
        let ambiguous = state
            .as_deref()
            .is_some_and(|st| ctx.library.is_ambiguous_state(st));
        if ambiguous && zip_code.is_none() {
            continue;
        }
        let parts = AddressParts {
            city: Some(kept.to_string()),
            state,
            zip_code,
            ..Default::default()
        };
        out.push(Detection::from_match(
            ctx.text,
            range,
            Components::PartialAddress(parts),
        ));
    }

    out
}

/// Drop leading prepositions and lowercase words from a city capture.
///
/// Returns the byte offset of the kept part and the kept text, or `None`
/// when nothing city-like remains.
fn strip_leading_words<'t>(library: &PatternLibrary, city: &'t str) -> Option<(usize, &'t str)> {
    let is_blank = |c: char| c == ' ' || c == '\t';
    let mut offset = 0;
    let mut rest = city;

    loop {
        let word_end = rest.find(is_blank).unwrap_or(rest.len());
        let word = &rest[..word_end];
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if capitalized && !library.is_preposition(word) {
            return Some((offset, rest));
        }
        if word_end == rest.len() {
            return None;
        }
        let next = rest[word_end..].trim_start_matches(is_blank);
        offset += rest.len() - next.len();
        rest = next;
    }
}

/// Bare ZIP codes, only when a cue such as "zip code" closely precedes them.
fn scan_cued_zip(ctx: &ScanContext<'_>) -> Vec<Detection> {
    let lib = ctx.library;
    let mut out = Vec::new();
    if lib.zip_cues().is_empty() {
        return out;
    }

    for caps in capped(lib.zip_code.captures_iter(ctx.text), ctx.cap(), "zip_code") {
        let Some(whole) = caps.get(0) else { continue };
        if !preceded_by_cue(ctx, whole.start()) || overlaps_any(&whole.range(), &ctx.blocked) {
            continue;
        }
        let parts = AddressParts {
            zip_code: capture(&caps, "zip"),
            ..Default::default()
        };
        out.push(Detection::from_match(
            ctx.text,
            whole.range(),
            Components::PartialAddress(parts),
        ));
    }

    out
}

/// Whether a cue phrase ends at most `zip_cue_window` characters before `start`.
fn preceded_by_cue(ctx: &ScanContext<'_>, start: usize) -> bool {
    let window = ctx.config.zip_cue_window;
    let longest = ctx
        .library
        .zip_cues()
        .iter()
        .map(|cue| cue.chars().count())
        .max()
        .unwrap_or(0);
    let from = chars_back(ctx.text, start, window + longest);
    let before = ctx.text[from..start].to_lowercase();

    ctx.library.zip_cues().iter().any(|cue| {
        before
            .rfind(cue.as_str())
            .map(|pos| before[pos + cue.len()..].chars().count() <= window)
            .unwrap_or(false)
    })
}
