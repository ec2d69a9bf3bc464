//! The per-item reconciliation algorithm.
//!
//! Evaluated at an instant `now`, an item's published revisions reduce to
//! exactly one live winner: the greatest `published_at` not exceeding
//! `now`. Older revisions are unpublished — and that change is persisted
//! before the snapshot write, so a retried pass cannot re-select them.
//! Future-dated revisions are never touched. Re-running the algorithm on
//! an already-reconciled item is a NoOp, which is what makes passes safely
//! re-entrant.

use vellum_core::selection::{select_active, Candidate};
use vellum_core::types::{ItemNumber, Timestamp};
use vellum_db::models::content_item::ContentItem;
use vellum_db::repositories::snapshot_repo::snapshot_from_revision;

use crate::store::{ContentStore, StoreError};

/// What one reconciliation did.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// Nothing to do: zero or one published revision, or all future-dated.
    NoOp,
    /// A revision was activated and its snapshot materialized.
    Activated {
        item_number: ItemNumber,
        title: String,
        url_path: String,
        published_at: Timestamp,
        /// URLs whose cached copies are now stale: the active path, plus
        /// the previous snapshot's path when the item moved.
        changed_urls: Vec<String>,
    },
}

/// Reconcile one item as of `now`.
///
/// Persistence failures abort this item only; the caller logs and moves
/// on to the next candidate. The next scheduled pass re-evaluates from
/// current state.
pub async fn reconcile_item(
    store: &dyn ContentStore,
    item_number: ItemNumber,
    now: Timestamp,
) -> Result<ReconcileOutcome, StoreError> {
    let versions = store.load_published_versions(item_number, now).await?;

    let candidates: Vec<Candidate<usize>> = versions
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| {
            v.published_at.map(|published_at| Candidate {
                key: idx,
                published_at,
            })
        })
        .collect();

    let Some(selection) = select_active(&candidates) else {
        return Ok(ReconcileOutcome::NoOp);
    };

    let active = &versions[selection.active.key];
    let active_published_at = selection.active.published_at;

    // Unpublish superseded revisions first and let that settle before the
    // snapshot write; a retried pass must not re-select them.
    for superseded in &selection.superseded {
        let row = &versions[superseded.key];
        store.unpublish(row.id).await?;
        tracing::debug!(
            item_number,
            version = row.version_number,
            "Unpublished superseded revision"
        );
    }

    let previous = store.find_active_snapshot(item_number).await?;
    let snapshot = snapshot_from_revision(active, active_published_at);
    store.replace_snapshot(&snapshot).await?;

    let mut changed_urls = vec![snapshot.url_path.clone()];
    if let Some(previous) = previous {
        if previous.url_path != snapshot.url_path {
            changed_urls.push(previous.url_path);
        }
    }

    tracing::info!(
        item_number,
        version = active.version_number,
        url_path = %snapshot.url_path,
        "Activated revision"
    );

    Ok(ReconcileOutcome::Activated {
        item_number,
        title: active.title.clone(),
        url_path: snapshot.url_path,
        published_at: active_published_at,
        changed_urls,
    })
}
