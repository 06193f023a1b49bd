//! Exact-shape PII: email, phone, SSN.

use regex::Regex;

use super::{capped, ScanContext};
use crate::detection::{Components, Detection};

pub(super) fn scan_email(ctx: &ScanContext<'_>) -> Vec<Detection> {
    scan_shape(ctx, &ctx.library.email, "email", Components::Email)
}

pub(super) fn scan_phone(ctx: &ScanContext<'_>) -> Vec<Detection> {
    scan_shape(ctx, &ctx.library.phone, "phone", Components::Phone)
}

pub(super) fn scan_ssn(ctx: &ScanContext<'_>) -> Vec<Detection> {
    scan_shape(ctx, &ctx.library.ssn, "ssn", Components::Ssn)
}

fn scan_shape(
    ctx: &ScanContext<'_>,
    re: &Regex,
    family: &'static str,
    components: Components,
) -> Vec<Detection> {
    capped(re.find_iter(ctx.text), ctx.cap(), family)
        .map(|m| Detection::from_match(ctx.text, m.range(), components.clone()))
        .collect()
}
