//! Persistence seam for the reconciliation engine.
//!
//! The engine depends only on [`ContentStore`], never on a specific
//! storage engine. [`PgContentStore`] is the Postgres implementation over
//! the `vellum-db` repositories; tests run against an in-memory fake.

use async_trait::async_trait;
use vellum_cdn::ProviderSetting;
use vellum_db::models::content_item::ContentItem;
use vellum_db::models::snapshot::{NewSnapshot, PublishedSnapshot};
use vellum_db::repositories::{
    content_item_repo::group_candidates_in_memory, CdnSettingRepo, ContentItemRepo, SnapshotRepo,
};
use vellum_db::DbPool;
use vellum_core::types::{DbId, ItemNumber, Timestamp};

/// Storage failure, recovered at item-number granularity by the caller.
#[derive(Debug, thiserror::Error)]
#[error("Storage error: {0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self(e.to_string())
    }
}

/// The persistence operations reconciliation needs.
///
/// The backing store may be relational or document-oriented; callers must
/// tolerate stores that cannot group-and-count server-side (see
/// [`PgContentStore::candidate_items`] for the fallback discipline).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Item numbers holding two or more published revisions at or before
    /// `now` — the reconciliation candidates.
    async fn candidate_items(&self, now: Timestamp) -> Result<Vec<ItemNumber>, StoreError>;

    /// Non-deleted revisions of one item with `published_at <= now`, most
    /// recently published first.
    async fn load_published_versions(
        &self,
        item_number: ItemNumber,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, StoreError>;

    /// Clear `published_at` on a superseded revision. Must be durable
    /// before the caller proceeds to snapshot materialization.
    async fn unpublish(&self, id: DbId) -> Result<(), StoreError>;

    /// The current non-redirect snapshot for an item, if any.
    async fn find_active_snapshot(
        &self,
        item_number: ItemNumber,
    ) -> Result<Option<PublishedSnapshot>, StoreError>;

    /// Replace the item's non-redirect snapshot: delete the old one (redirect
    /// snapshots untouched) and insert the new materialization.
    async fn replace_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), StoreError>;

    /// The tenant's enabled CDN provider settings.
    async fn list_cdn_settings(&self) -> Result<Vec<ProviderSetting>, StoreError>;
}

/// Postgres-backed store over one tenant's pool.
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn candidate_items(&self, now: Timestamp) -> Result<Vec<ItemNumber>, StoreError> {
        // Prefer server-side grouping; fall back to the flat scan plus
        // client-side grouping when the backend rejects the aggregate.
        match ContentItemRepo::items_with_multiple_published(&self.pool, now).await {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, "Grouped candidate scan failed; grouping client-side");
                let flat = ContentItemRepo::list_published_item_numbers(&self.pool, now).await?;
                Ok(group_candidates_in_memory(&flat))
            }
        }
    }

    async fn load_published_versions(
        &self,
        item_number: ItemNumber,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, StoreError> {
        Ok(ContentItemRepo::list_published_versions(&self.pool, item_number, now).await?)
    }

    async fn unpublish(&self, id: DbId) -> Result<(), StoreError> {
        Ok(ContentItemRepo::unpublish(&self.pool, id).await?)
    }

    async fn find_active_snapshot(
        &self,
        item_number: ItemNumber,
    ) -> Result<Option<PublishedSnapshot>, StoreError> {
        Ok(SnapshotRepo::find_active_by_item(&self.pool, item_number).await?)
    }

    async fn replace_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), StoreError> {
        SnapshotRepo::delete_non_redirect(&self.pool, snapshot.item_number).await?;
        SnapshotRepo::insert(&self.pool, snapshot).await?;
        Ok(())
    }

    async fn list_cdn_settings(&self) -> Result<Vec<ProviderSetting>, StoreError> {
        let rows = CdnSettingRepo::list_enabled(&self.pool).await?;
        let mut settings = Vec::with_capacity(rows.len());
        for row in rows {
            match ProviderSetting::from_row(&row.provider_kind, row.config) {
                Ok(setting) => settings.push(setting),
                Err(e) => {
                    // An unrecognized row must not take the tenant's other
                    // providers down with it.
                    tracing::warn!(setting_id = row.id, error = %e, "Skipping CDN setting");
                }
            }
        }
        Ok(settings)
    }
}
