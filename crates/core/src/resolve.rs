//! Overlap resolution between candidates from different pattern families.
//!
//! The resolution is greedy rather than an optimal interval schedule: a
//! candidate is compared only against what was accepted before it, so the
//! order of the input decides ties.

use crate::detection::{Detection, Span};

pub fn overlaps_any<S: Span + ?Sized, T: Span>(span: &S, others: &[T]) -> bool {
    others.iter().any(|other| span.overlaps(other))
}

/// Keep only the candidates that do not touch any span in `claimed`.
pub fn uncontested(candidates: Vec<Detection>, claimed: &[Detection]) -> Vec<Detection> {
    candidates
        .into_iter()
        .filter(|candidate| !overlaps_any(candidate, claimed))
        .collect()
}

/// Resolve overlapping candidates into a pairwise-disjoint set.
///
/// Candidates are visited in input order. A candidate that overlaps nothing
/// accepted so far is accepted. One that overlaps replaces the first entry
/// it overlaps only when its confidence is strictly higher than every entry
/// it overlaps; those other entries are dropped. The survivors come back
/// sorted by descending confidence, then by start offset.
pub fn resolve(candidates: Vec<Detection>) -> Vec<Detection> {
    let total = candidates.len();
    let mut accepted: Vec<Detection> = Vec::with_capacity(total);

    for candidate in candidates {
        let overlapping: Vec<usize> = accepted
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.overlaps(&candidate))
            .map(|(idx, _)| idx)
            .collect();

        let Some(&first) = overlapping.first() else {
            accepted.push(candidate);
            continue;
        };

        let wins = overlapping
            .iter()
            .all(|&idx| candidate.confidence > accepted[idx].confidence);
        if wins {
            for &idx in overlapping[1..].iter().rev() {
                accepted.remove(idx);
            }
            accepted[first] = candidate;
        }
    }

    sort_by_confidence(&mut accepted);
    log::debug!("[Resolve] {} candidates -> {} detections", total, accepted.len());
    accepted
}

/// Descending confidence; ties keep document order.
pub fn sort_by_confidence(detections: &mut [Detection]) {
    detections.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.start.cmp(&b.start))
    });
}

/// Ascending start offset, for callers that need document order.
pub fn sort_by_position(detections: &mut [Detection]) {
    detections.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));
}
