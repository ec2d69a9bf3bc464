//! Repository for the `tenants` registry in the control database.

use sqlx::PgPool;

use crate::models::tenant::Tenant;

const TENANT_COLUMNS: &str = "\
    id, domain, database_url, storage_url, is_active, created_at";

/// Read access to the tenant registry.
pub struct TenantRepo;

impl TenantRepo {
    /// All active tenants, ordered by domain for stable pass ordering.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!(
            "SELECT {TENANT_COLUMNS} FROM tenants \
             WHERE is_active = true \
             ORDER BY domain"
        );
        sqlx::query_as::<_, Tenant>(&query).fetch_all(pool).await
    }

    /// Look up one tenant by its primary domain.
    pub async fn find_by_domain(
        pool: &PgPool,
        domain: &str,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE domain = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(domain)
            .fetch_optional(pool)
            .await
    }
}
