//! CDN provider setting models.
//!
//! One row per configured edge-cache provider for a tenant. The `config`
//! column is an opaque JSON payload whose shape depends on `provider_kind`;
//! the CDN crate owns deserializing it into typed credentials. Rows are
//! written by the configuration UI and read-only to this subsystem.

use serde::Serialize;
use sqlx::FromRow;
use vellum_core::types::{DbId, Timestamp};

/// A row from the `cdn_provider_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CdnProviderSetting {
    pub id: DbId,
    /// Tagged provider kind, e.g. `"azure_edge"`, `"cloudflare"`.
    pub provider_kind: String,
    /// Provider-specific credentials and identifiers.
    pub config: serde_json::Value,
    pub is_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
