//! Repository for the `cdn_provider_settings` table (read-only here; the
//! configuration UI owns writes).

use sqlx::PgPool;

use crate::models::cdn_setting::CdnProviderSetting;

const SETTING_COLUMNS: &str = "\
    id, provider_kind, config, is_enabled, created_at, updated_at";

/// Read access to a tenant's configured CDN providers.
pub struct CdnSettingRepo;

impl CdnSettingRepo {
    /// All enabled provider settings for the tenant, in creation order.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<CdnProviderSetting>, sqlx::Error> {
        let query = format!(
            "SELECT {SETTING_COLUMNS} FROM cdn_provider_settings \
             WHERE is_enabled = true \
             ORDER BY id"
        );
        sqlx::query_as::<_, CdnProviderSetting>(&query)
            .fetch_all(pool)
            .await
    }
}
