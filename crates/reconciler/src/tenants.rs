//! Tenant resolution and per-tenant scoped data handles.
//!
//! Each tenant may point at an entirely distinct storage backend, so a
//! handle is opened fresh for one tenant's pass and explicitly released
//! afterwards — never reused or pooled across tenants.

use async_trait::async_trait;
use std::sync::Arc;
use vellum_db::DbPool;

use crate::store::{ContentStore, PgContentStore, StoreError};

// ---------------------------------------------------------------------------
// TenantConnection / TenantDirectory
// ---------------------------------------------------------------------------

/// Where one tenant's data lives. Immutable for the duration of a pass.
#[derive(Debug, Clone)]
pub struct TenantConnection {
    pub domain: String,
    pub database_url: String,
    pub storage_url: Option<String>,
}

/// Tenant-level failure, recovered at tenant granularity by the pass.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Tenant resolution failed for {domain}: {reason}")]
    Resolution { domain: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves the set of active tenants and their connections.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// All active tenant domains, in stable order.
    async fn list_active_domains(&self) -> Result<Vec<String>, TenantError>;

    /// Resolve one domain to its connection details.
    async fn resolve(&self, domain: &str) -> Result<TenantConnection, TenantError>;
}

/// Single-tenant mode: one ambient connection, no registry.
pub struct SingleTenantDirectory {
    connection: TenantConnection,
}

impl SingleTenantDirectory {
    pub fn new(connection: TenantConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TenantDirectory for SingleTenantDirectory {
    async fn list_active_domains(&self) -> Result<Vec<String>, TenantError> {
        Ok(vec![self.connection.domain.clone()])
    }

    async fn resolve(&self, domain: &str) -> Result<TenantConnection, TenantError> {
        if domain == self.connection.domain {
            Ok(self.connection.clone())
        } else {
            Err(TenantError::Resolution {
                domain: domain.to_string(),
                reason: "Unknown domain in single-tenant mode".to_string(),
            })
        }
    }
}

/// Multi-tenant mode: registry rows in the control database.
pub struct PgTenantDirectory {
    control_pool: DbPool,
}

impl PgTenantDirectory {
    pub fn new(control_pool: DbPool) -> Self {
        Self { control_pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn list_active_domains(&self) -> Result<Vec<String>, TenantError> {
        let tenants = vellum_db::repositories::TenantRepo::list_active(&self.control_pool)
            .await
            .map_err(StoreError::from)?;
        Ok(tenants.into_iter().map(|t| t.domain).collect())
    }

    async fn resolve(&self, domain: &str) -> Result<TenantConnection, TenantError> {
        let tenant = vellum_db::repositories::TenantRepo::find_by_domain(&self.control_pool, domain)
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| TenantError::Resolution {
                domain: domain.to_string(),
                reason: "Not present in tenant registry".to_string(),
            })?;
        Ok(TenantConnection {
            domain: tenant.domain,
            database_url: tenant.database_url,
            storage_url: tenant.storage_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Scoped tenant handles
// ---------------------------------------------------------------------------

/// An open, tenant-scoped data handle: acquire, use for one tenant's
/// sweep, then [`close`](TenantHandle::close).
pub struct TenantHandle {
    pub domain: String,
    pub store: Arc<dyn ContentStore>,
    pool: Option<DbPool>,
}

impl TenantHandle {
    /// Handle over an already-built store (in-memory fakes in tests).
    pub fn from_store(domain: impl Into<String>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            domain: domain.into(),
            store,
            pool: None,
        }
    }

    /// Release the handle, closing the underlying pool if one was opened.
    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

/// Opens a fresh scoped handle per tenant.
#[async_trait]
pub trait TenantStores: Send + Sync {
    async fn open(&self, connection: &TenantConnection) -> Result<TenantHandle, StoreError>;
}

/// Postgres handles: one small, short-lived pool per tenant per pass.
pub struct PgTenantStores;

#[async_trait]
impl TenantStores for PgTenantStores {
    async fn open(&self, connection: &TenantConnection) -> Result<TenantHandle, StoreError> {
        let pool = vellum_db::create_tenant_pool(&connection.database_url).await?;
        Ok(TenantHandle {
            domain: connection.domain.clone(),
            store: Arc::new(PgContentStore::new(pool.clone())),
            pool: Some(pool),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> TenantConnection {
        TenantConnection {
            domain: "a.example.com".to_string(),
            database_url: "postgres://localhost/a".to_string(),
            storage_url: None,
        }
    }

    #[tokio::test]
    async fn single_tenant_directory_lists_its_domain() {
        let directory = SingleTenantDirectory::new(connection());
        let domains = directory.list_active_domains().await.unwrap();
        assert_eq!(domains, vec!["a.example.com"]);
    }

    #[tokio::test]
    async fn single_tenant_directory_resolves_only_its_domain() {
        let directory = SingleTenantDirectory::new(connection());
        assert!(directory.resolve("a.example.com").await.is_ok());
        assert!(directory.resolve("b.example.com").await.is_err());
    }
}
