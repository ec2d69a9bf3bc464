//! In-memory `ContentStore` fake shared by the reconciler tests.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use vellum_cdn::ProviderSetting;
use vellum_core::types::{DbId, ItemNumber, Timestamp};
use vellum_db::models::content_item::{ContentItem, ContentStatus};
use vellum_db::models::snapshot::{NewSnapshot, PublishedSnapshot};
use vellum_reconciler::{ContentStore, StoreError};

#[derive(Default)]
struct State {
    items: Vec<ContentItem>,
    snapshots: Vec<PublishedSnapshot>,
    settings: Vec<ProviderSetting>,
    next_snapshot_id: DbId,
    fail_unpublish_ids: HashSet<DbId>,
}

/// Store fake with controllable failure injection.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_revision(&self, item: ContentItem) {
        self.state.lock().unwrap().items.push(item);
    }

    pub fn add_snapshot(&self, snapshot: PublishedSnapshot) {
        let mut state = self.state.lock().unwrap();
        state.next_snapshot_id = state.next_snapshot_id.max(snapshot.id) + 1;
        state.snapshots.push(snapshot);
    }

    /// Make `unpublish` fail for a specific revision row.
    pub fn fail_unpublish(&self, id: DbId) {
        self.state.lock().unwrap().fail_unpublish_ids.insert(id);
    }

    /// Revision ids that still carry a `published_at`.
    pub fn published_ids(&self) -> Vec<DbId> {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.published_at.is_some())
            .map(|i| i.id)
            .collect()
    }

    pub fn snapshots(&self) -> Vec<PublishedSnapshot> {
        self.state.lock().unwrap().snapshots.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn candidate_items(&self, now: Timestamp) -> Result<Vec<ItemNumber>, StoreError> {
        let state = self.state.lock().unwrap();
        let numbers: Vec<ItemNumber> = state
            .items
            .iter()
            .filter(|i| {
                i.status_id != ContentStatus::Deleted.id()
                    && i.published_at.map(|p| p <= now).unwrap_or(false)
            })
            .map(|i| i.item_number)
            .collect();
        // Same accommodation a document store would need: group client-side.
        Ok(vellum_db::repositories::content_item_repo::group_candidates_in_memory(&numbers))
    }

    async fn load_published_versions(
        &self,
        item_number: ItemNumber,
        now: Timestamp,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut versions: Vec<ContentItem> = state
            .items
            .iter()
            .filter(|i| {
                i.item_number == item_number
                    && i.status_id != ContentStatus::Deleted.id()
                    && i.published_at.map(|p| p <= now).unwrap_or(false)
            })
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(versions)
    }

    async fn unpublish(&self, id: DbId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_unpublish_ids.contains(&id) {
            return Err(StoreError(format!("injected failure unpublishing row {id}")));
        }
        for item in &mut state.items {
            if item.id == id {
                item.published_at = None;
                item.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn find_active_snapshot(
        &self,
        item_number: ItemNumber,
    ) -> Result<Option<PublishedSnapshot>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .snapshots
            .iter()
            .find(|s| s.item_number == item_number && !s.is_redirect)
            .cloned())
    }

    async fn replace_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .snapshots
            .retain(|s| !(s.item_number == snapshot.item_number && !s.is_redirect));
        state.next_snapshot_id += 1;
        let id = state.next_snapshot_id;
        state.snapshots.push(PublishedSnapshot {
            id,
            item_number: snapshot.item_number,
            url_path: snapshot.url_path.clone(),
            parent_url_path: snapshot.parent_url_path.clone(),
            title: snapshot.title.clone(),
            content: snapshot.content.clone(),
            banner_image: snapshot.banner_image.clone(),
            metadata: snapshot.metadata.clone(),
            is_redirect: snapshot.is_redirect,
            published_at: snapshot.published_at,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_cdn_settings(&self) -> Result<Vec<ProviderSetting>, StoreError> {
        Ok(self.state.lock().unwrap().settings.clone())
    }
}

/// Build an Active revision row.
pub fn revision(
    id: DbId,
    item_number: ItemNumber,
    version_number: i32,
    url_path: &str,
    published_at: Option<Timestamp>,
) -> ContentItem {
    ContentItem {
        id,
        item_number,
        version_number,
        title: format!("Revision {version_number}"),
        content: format!("<p>body {version_number}</p>"),
        url_path: url_path.to_string(),
        banner_image: None,
        metadata: None,
        user_id: None,
        status_id: ContentStatus::Active.id(),
        published_at,
        expires_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Build a pre-existing snapshot row.
pub fn snapshot(
    id: DbId,
    item_number: ItemNumber,
    url_path: &str,
    is_redirect: bool,
    published_at: Timestamp,
) -> PublishedSnapshot {
    PublishedSnapshot {
        id,
        item_number,
        url_path: url_path.to_string(),
        parent_url_path: vellum_core::paths::parent_path(url_path),
        title: "Existing".to_string(),
        content: "<p>existing</p>".to_string(),
        banner_image: None,
        metadata: None,
        is_redirect,
        published_at,
        created_at: Utc::now(),
    }
}
