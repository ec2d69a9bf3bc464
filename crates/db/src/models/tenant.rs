//! Tenant registry models (control database).
//!
//! In multi-tenant deployments a small control database lists the active
//! tenant domains and where each tenant's own content database lives.

use serde::Serialize;
use sqlx::FromRow;
use vellum_core::types::{DbId, Timestamp};

/// A row from the `tenants` table in the control database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    /// Primary domain, e.g. `"a.example.com"`. Unique.
    pub domain: String,
    /// Connection string for the tenant's content database.
    pub database_url: String,
    /// Optional blob-storage connection string for the tenant.
    pub storage_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}
