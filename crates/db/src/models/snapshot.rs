//! Published snapshot models.
//!
//! A snapshot is the denormalized, render-ready copy of the revision that
//! is currently live for one item. The reconciler owns these rows
//! exclusively: at most one non-redirect snapshot exists per item, while
//! redirect snapshots (legacy URL forwarding) are a separate concern and
//! survive reconciliation untouched.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vellum_core::types::{DbId, ItemNumber, Timestamp};

/// A row from the `published_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublishedSnapshot {
    pub id: DbId,
    pub item_number: ItemNumber,
    pub url_path: String,
    /// The path with its last segment removed; empty for the root.
    pub parent_url_path: String,
    pub title: String,
    pub content: String,
    pub banner_image: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub is_redirect: bool,
    pub published_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for materializing a snapshot from an active revision.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSnapshot {
    pub item_number: ItemNumber,
    pub url_path: String,
    pub parent_url_path: String,
    pub title: String,
    pub content: String,
    pub banner_image: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub is_redirect: bool,
    pub published_at: Timestamp,
}
