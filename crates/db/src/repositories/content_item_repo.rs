//! Repository for the `content_items` revision table.

use sqlx::PgPool;
use vellum_core::types::{DbId, ItemNumber, Timestamp};

use crate::models::content_item::{ContentItem, ContentStatus, CreateContentItem};

const ITEM_COLUMNS: &str = "\
    id, item_number, version_number, title, content, url_path, banner_image, \
    metadata, user_id, status_id, published_at, expires_at, created_at, updated_at";

/// Queries and mutations for content revisions.
pub struct ContentItemRepo;

impl ContentItemRepo {
    /// Item numbers that currently hold two or more published revisions
    /// whose `published_at` is at or before `now` — the reconciliation
    /// candidates. Uses server-side grouping; see
    /// [`group_candidates_in_memory`] for stores without aggregation.
    pub async fn items_with_multiple_published(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ItemNumber>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT item_number FROM content_items \
             WHERE published_at IS NOT NULL \
               AND published_at <= $1 \
               AND status_id <> $2 \
             GROUP BY item_number \
             HAVING COUNT(*) >= 2 \
             ORDER BY item_number",
        )
        .bind(now)
        .bind(ContentStatus::Deleted.id())
        .fetch_all(pool)
        .await
    }

    /// Flat (ungrouped) list of item numbers with a published revision at
    /// or before `now`, one entry per revision. Fallback input for
    /// [`group_candidates_in_memory`] on backends that cannot group and
    /// count server-side.
    pub async fn list_published_item_numbers(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ItemNumber>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT item_number FROM content_items \
             WHERE published_at IS NOT NULL \
               AND published_at <= $1 \
               AND status_id <> $2",
        )
        .bind(now)
        .bind(ContentStatus::Deleted.id())
        .fetch_all(pool)
        .await
    }

    /// All non-deleted revisions of one item with `published_at` at or
    /// before `now`, most recently published first.
    pub async fn list_published_versions(
        pool: &PgPool,
        item_number: ItemNumber,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM content_items \
             WHERE item_number = $1 \
               AND published_at IS NOT NULL \
               AND published_at <= $2 \
               AND status_id <> $3 \
             ORDER BY published_at DESC"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(item_number)
            .bind(now)
            .bind(ContentStatus::Deleted.id())
            .fetch_all(pool)
            .await
    }

    /// Clear `published_at` on a superseded revision.
    pub async fn unpublish(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE content_items SET published_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert a new revision (editor-facing seam; the reconciler never
    /// creates revisions).
    pub async fn create(
        pool: &PgPool,
        input: &CreateContentItem,
    ) -> Result<ContentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_items \
             (item_number, version_number, title, content, url_path, banner_image, \
              metadata, user_id, status_id, published_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(input.item_number)
            .bind(input.version_number)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.url_path)
            .bind(&input.banner_image)
            .bind(&input.metadata)
            .bind(input.user_id)
            .bind(input.status_id)
            .bind(input.published_at)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }
}

/// Group a flat per-revision item-number list client-side and keep the
/// numbers that appear at least twice, in first-seen order.
///
/// Document-store backends cannot always group and count in one query;
/// this is the documented accommodation for them.
pub fn group_candidates_in_memory(item_numbers: &[ItemNumber]) -> Vec<ItemNumber> {
    let mut counts: std::collections::HashMap<ItemNumber, usize> = std::collections::HashMap::new();
    for n in item_numbers {
        *counts.entry(*n).or_default() += 1;
    }

    let mut seen = std::collections::HashSet::new();
    item_numbers
        .iter()
        .filter(|n| counts[n] >= 2 && seen.insert(**n))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::group_candidates_in_memory;

    #[test]
    fn keeps_only_repeated_item_numbers() {
        let rows = [42, 7, 42, 9, 7, 42];
        assert_eq!(group_candidates_in_memory(&rows), vec![42, 7]);
    }

    #[test]
    fn single_revision_items_are_excluded() {
        let rows = [1, 2, 3];
        assert!(group_candidates_in_memory(&rows).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_candidates_in_memory(&[]).is_empty());
    }
}
