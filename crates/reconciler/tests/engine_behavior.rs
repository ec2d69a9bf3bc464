//! Behavioral tests for the per-item reconciliation algorithm, run
//! against the in-memory store fake.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::{revision, snapshot, MemoryStore};
use vellum_reconciler::{reconcile_item, ReconcileOutcome};

#[tokio::test]
async fn zero_published_revisions_is_noop() {
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", None));

    let outcome = reconcile_item(&store, 42, Utc::now()).await.unwrap();

    assert_matches!(outcome, ReconcileOutcome::NoOp);
}

#[tokio::test]
async fn single_published_revision_is_already_canonical() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::hours(1))));

    let outcome = reconcile_item(&store, 42, now).await.unwrap();

    assert_matches!(outcome, ReconcileOutcome::NoOp);
    assert_eq!(store.published_ids(), vec![1]);
}

#[tokio::test]
async fn single_winner_latest_published_survives() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::days(3))));
    store.add_revision(revision(2, 42, 2, "/a", Some(now - Duration::days(2))));
    store.add_revision(revision(3, 42, 3, "/a", Some(now - Duration::days(1))));

    let outcome = reconcile_item(&store, 42, now).await.unwrap();

    assert_matches!(outcome, ReconcileOutcome::Activated { item_number: 42, .. });
    // T1 and T2 unpublished, T3 still live.
    assert_eq!(store.published_ids(), vec![3]);

    let snapshots = store.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].url_path, "/a");
    assert_eq!(snapshots[0].title, "Revision 3");
}

#[tokio::test]
async fn future_revision_is_never_unpublished() {
    // Item #42: versions at now-2d, now-1d, now+1d.
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/launch", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/launch", Some(now - Duration::days(1))));
    store.add_revision(revision(3, 42, 3, "/launch", Some(now + Duration::days(1))));

    let outcome = reconcile_item(&store, 42, now).await.unwrap();

    // now-1d is active, now-2d unpublished, now+1d still scheduled.
    let ReconcileOutcome::Activated { url_path, .. } = outcome else {
        panic!("expected activation");
    };
    assert_eq!(url_path, "/launch");

    let mut published = store.published_ids();
    published.sort();
    assert_eq!(published, vec![2, 3]);

    let snapshots = store.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].title, "Revision 2");
}

#[tokio::test]
async fn reconciliation_is_idempotent() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/a", Some(now - Duration::days(1))));

    let first = reconcile_item(&store, 42, now).await.unwrap();
    assert_matches!(first, ReconcileOutcome::Activated { .. });

    let published_after_first = store.published_ids();
    let snapshots_after_first = store.snapshots();

    let second = reconcile_item(&store, 42, now).await.unwrap();
    assert_matches!(second, ReconcileOutcome::NoOp);

    assert_eq!(store.published_ids(), published_after_first);
    let snapshots_after_second = store.snapshots();
    assert_eq!(snapshots_after_second.len(), snapshots_after_first.len());
    assert_eq!(snapshots_after_second[0].id, snapshots_after_first[0].id);
}

#[tokio::test]
async fn redirect_snapshot_survives_reconciliation() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/page", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/page", Some(now - Duration::days(1))));
    // A redirect sharing the path, and the stale non-redirect snapshot.
    store.add_snapshot(snapshot(10, 42, "/page", true, now - Duration::days(30)));
    store.add_snapshot(snapshot(11, 42, "/page", false, now - Duration::days(2)));

    reconcile_item(&store, 42, now).await.unwrap();

    let snapshots = store.snapshots();
    let redirects: Vec<_> = snapshots.iter().filter(|s| s.is_redirect).collect();
    let active: Vec<_> = snapshots.iter().filter(|s| !s.is_redirect).collect();

    assert_eq!(redirects.len(), 1);
    assert_eq!(redirects[0].id, 10);
    assert_eq!(active.len(), 1);
    assert_ne!(active[0].id, 11);
    assert_eq!(active[0].title, "Revision 2");
}

#[tokio::test]
async fn moved_item_reports_both_urls() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/old-path", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/new-path", Some(now - Duration::days(1))));
    store.add_snapshot(snapshot(10, 42, "/old-path", false, now - Duration::days(2)));

    let outcome = reconcile_item(&store, 42, now).await.unwrap();

    let ReconcileOutcome::Activated { changed_urls, .. } = outcome else {
        panic!("expected activation");
    };
    assert!(changed_urls.contains(&"/new-path".to_string()));
    assert!(changed_urls.contains(&"/old-path".to_string()));
}

#[tokio::test]
async fn unchanged_path_reports_single_url() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/same", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/same", Some(now - Duration::days(1))));
    store.add_snapshot(snapshot(10, 42, "/same", false, now - Duration::days(2)));

    let outcome = reconcile_item(&store, 42, now).await.unwrap();

    let ReconcileOutcome::Activated { changed_urls, .. } = outcome else {
        panic!("expected activation");
    };
    assert_eq!(changed_urls, vec!["/same".to_string()]);
}

#[tokio::test]
async fn parent_path_is_materialized_on_the_snapshot() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/news/2026/spring", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/news/2026/spring", Some(now - Duration::days(1))));

    reconcile_item(&store, 42, now).await.unwrap();

    let snapshots = store.snapshots();
    assert_eq!(snapshots[0].parent_url_path, "/news/2026");
}

#[tokio::test]
async fn persistence_failure_surfaces_as_error() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/a", Some(now - Duration::days(1))));
    store.fail_unpublish(1);

    let result = reconcile_item(&store, 42, now).await;

    assert!(result.is_err());
    // No snapshot was written for the aborted item.
    assert!(store.snapshots().is_empty());
}

#[tokio::test]
async fn failing_item_does_not_block_the_next_candidate() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/a", Some(now - Duration::days(1))));
    store.add_revision(revision(3, 43, 1, "/b", Some(now - Duration::days(2))));
    store.add_revision(revision(4, 43, 2, "/b", Some(now - Duration::days(1))));
    store.fail_unpublish(1);

    assert!(reconcile_item(&store, 42, now).await.is_err());
    let outcome = reconcile_item(&store, 43, now).await.unwrap();

    assert_matches!(outcome, ReconcileOutcome::Activated { item_number: 43, .. });
    assert_eq!(store.snapshots().len(), 1);
    assert_eq!(store.snapshots()[0].item_number, 43);
}

#[tokio::test]
async fn candidate_scan_finds_only_multi_version_items() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.add_revision(revision(1, 42, 1, "/a", Some(now - Duration::days(2))));
    store.add_revision(revision(2, 42, 2, "/a", Some(now - Duration::days(1))));
    store.add_revision(revision(3, 43, 1, "/b", Some(now - Duration::days(1))));
    store.add_revision(revision(4, 44, 1, "/c", Some(now + Duration::days(1))));
    store.add_revision(revision(5, 44, 2, "/c", Some(now + Duration::days(2))));

    use vellum_reconciler::ContentStore;
    let candidates = store.candidate_items(now).await.unwrap();

    // 43 has one revision; 44's are both future-dated.
    assert_eq!(candidates, vec![42]);
}
