//! Content item revision models.
//!
//! One row per edited revision. All revisions of a logical item share an
//! `item_number`; `version_number` increases monotonically within it. A
//! revision is scheduled or live once `published_at` is set.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vellum_core::types::{DbId, ItemNumber, Timestamp};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Content revision lifecycle status, matching the `content_statuses`
/// lookup table (1-based).
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Draft = 1,
    Active = 2,
    Redirect = 3,
    Deleted = 4,
}

impl ContentStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status ID back to the enum.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::Active),
            3 => Some(Self::Redirect),
            4 => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// A row from the `content_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentItem {
    pub id: DbId,
    pub item_number: ItemNumber,
    pub version_number: i32,
    pub title: String,
    pub content: String,
    pub url_path: String,
    pub banner_image: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
    pub status_id: StatusId,
    /// Null = not live; non-null = scheduled or active as of that instant (UTC).
    pub published_at: Option<Timestamp>,
    /// Advisory cutoff for renderers; the reconciler does not enforce it.
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new revision (editor-facing seam).
#[derive(Debug, Deserialize)]
pub struct CreateContentItem {
    pub item_number: ItemNumber,
    pub version_number: i32,
    pub title: String,
    pub content: String,
    pub url_path: String,
    pub banner_image: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
    pub status_id: StatusId,
    pub published_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}
