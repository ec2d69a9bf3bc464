//! Active-version selection for scheduled publication.
//!
//! A content item may carry several revisions whose `published_at` stamps
//! are scattered across the past and future. At any evaluation instant
//! exactly one revision may be live: the one with the greatest
//! `published_at` not exceeding `now`. Everything older is superseded and
//! must be unpublished; everything in the future is left untouched.
//!
//! The selection itself is pure so the reconciliation engine and its tests
//! share one source of truth for the winner rule.

use crate::types::Timestamp;

/// A candidate revision as seen by the selector: an opaque caller-side key
/// plus its publication instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<K> {
    pub key: K,
    pub published_at: Timestamp,
}

/// Result of selecting among the published revisions of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K> {
    /// The single revision that is live as of the evaluation instant.
    pub active: Candidate<K>,
    /// Revisions with an earlier `published_at` that must be unpublished.
    pub superseded: Vec<Candidate<K>>,
}

/// Pick the active revision among candidates already filtered to
/// `published_at <= now`.
///
/// Returns `None` when fewer than two candidates exist: zero means nothing
/// is live, one means the single published revision is already canonical
/// and there is nothing to reconcile.
///
/// Ties on `published_at` are broken by input order (first wins), which for
/// rows loaded in descending publication order means the row the store
/// returned first.
pub fn select_active<K: Copy>(candidates: &[Candidate<K>]) -> Option<Selection<K>> {
    if candidates.len() < 2 {
        return None;
    }

    let mut sorted: Vec<Candidate<K>> = candidates.to_vec();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let active = sorted[0];
    let superseded = sorted
        .into_iter()
        .skip(1)
        .filter(|c| c.published_at < active.published_at)
        .collect();

    Some(Selection { active, superseded })
}
