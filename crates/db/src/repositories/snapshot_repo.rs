//! Repository for the `published_snapshots` table.
//!
//! The reconciler is the only writer. Redirect snapshots are never deleted
//! here: they carry legacy URL forwarding and must survive reconciliation.

use sqlx::PgPool;
use vellum_core::types::{ItemNumber, Timestamp};

use crate::models::snapshot::{NewSnapshot, PublishedSnapshot};

const SNAPSHOT_COLUMNS: &str = "\
    id, item_number, url_path, parent_url_path, title, content, banner_image, \
    metadata, is_redirect, published_at, created_at";

/// Queries and mutations for published snapshots.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// The current non-redirect snapshot for an item, if any.
    pub async fn find_active_by_item(
        pool: &PgPool,
        item_number: ItemNumber,
    ) -> Result<Option<PublishedSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM published_snapshots \
             WHERE item_number = $1 AND is_redirect = false \
             LIMIT 1"
        );
        sqlx::query_as::<_, PublishedSnapshot>(&query)
            .bind(item_number)
            .fetch_optional(pool)
            .await
    }

    /// Delete the non-redirect snapshot for an item, leaving redirect
    /// snapshots in place. Returns the number of rows removed.
    pub async fn delete_non_redirect(
        pool: &PgPool,
        item_number: ItemNumber,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM published_snapshots WHERE item_number = $1 AND is_redirect = false",
        )
        .bind(item_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert a freshly materialized snapshot.
    pub async fn insert(
        pool: &PgPool,
        snapshot: &NewSnapshot,
    ) -> Result<PublishedSnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO published_snapshots \
             (item_number, url_path, parent_url_path, title, content, banner_image, \
              metadata, is_redirect, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SNAPSHOT_COLUMNS}"
        );
        sqlx::query_as::<_, PublishedSnapshot>(&query)
            .bind(snapshot.item_number)
            .bind(&snapshot.url_path)
            .bind(&snapshot.parent_url_path)
            .bind(&snapshot.title)
            .bind(&snapshot.content)
            .bind(&snapshot.banner_image)
            .bind(&snapshot.metadata)
            .bind(snapshot.is_redirect)
            .bind(snapshot.published_at)
            .fetch_one(pool)
            .await
    }

    /// Redirect snapshots sharing a URL path (diagnostics).
    pub async fn list_redirects_for_path(
        pool: &PgPool,
        url_path: &str,
    ) -> Result<Vec<PublishedSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM published_snapshots \
             WHERE url_path = $1 AND is_redirect = true \
             ORDER BY id"
        );
        sqlx::query_as::<_, PublishedSnapshot>(&query)
            .bind(url_path)
            .fetch_all(pool)
            .await
    }
}

/// Build the snapshot DTO for an active revision.
///
/// Copies the render-facing fields and computes the parent path from the
/// revision's URL path.
pub fn snapshot_from_revision(
    item: &crate::models::content_item::ContentItem,
    published_at: Timestamp,
) -> NewSnapshot {
    NewSnapshot {
        item_number: item.item_number,
        url_path: vellum_core::paths::normalize(&item.url_path),
        parent_url_path: vellum_core::paths::parent_path(&item.url_path),
        title: item.title.clone(),
        content: item.content.clone(),
        banner_image: item.banner_image.clone(),
        metadata: item.metadata.clone(),
        is_redirect: item.status_id
            == crate::models::content_item::ContentStatus::Redirect.id(),
        published_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content_item::{ContentItem, ContentStatus};
    use chrono::Utc;

    fn revision(url_path: &str, status: ContentStatus) -> ContentItem {
        ContentItem {
            id: 1,
            item_number: 42,
            version_number: 3,
            title: "Spring launch".into(),
            content: "<p>hello</p>".into(),
            url_path: url_path.into(),
            banner_image: None,
            metadata: None,
            user_id: None,
            status_id: status.id(),
            published_at: Some(Utc::now()),
            expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_copies_fields_and_computes_parent() {
        let now = Utc::now();
        let snapshot = snapshot_from_revision(&revision("/news/2026/spring", ContentStatus::Active), now);
        assert_eq!(snapshot.item_number, 42);
        assert_eq!(snapshot.url_path, "/news/2026/spring");
        assert_eq!(snapshot.parent_url_path, "/news/2026");
        assert_eq!(snapshot.published_at, now);
        assert!(!snapshot.is_redirect);
    }

    #[test]
    fn root_revision_has_empty_parent() {
        let snapshot = snapshot_from_revision(&revision("/", ContentStatus::Active), Utc::now());
        assert_eq!(snapshot.url_path, "/");
        assert_eq!(snapshot.parent_url_path, "");
    }

    #[test]
    fn redirect_status_marks_snapshot() {
        let snapshot = snapshot_from_revision(&revision("/old", ContentStatus::Redirect), Utc::now());
        assert!(snapshot.is_redirect);
    }
}
