//! The polymorphic purge capability.

use async_trait::async_trait;

use crate::result::PurgeResult;

/// One configured edge-cache provider.
///
/// Implementations are individually responsible for catching their own
/// transport and auth failures and returning failure-flagged
/// [`PurgeResult`]s — nothing here returns `Err`, so one provider's outage
/// can never abort a dispatch loop.
#[async_trait]
pub trait CdnProvider: Send + Sync {
    /// Display name for result records and logs. Purely presentational;
    /// dispatch branching goes by [`ProviderKind`](crate::ProviderKind).
    fn provider_name(&self) -> &str;

    /// Invalidate the given URL paths.
    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult>;

    /// Invalidate everything the provider caches for this configuration.
    async fn purge_all(&self) -> Vec<PurgeResult>;
}

impl std::fmt::Debug for dyn CdnProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnProvider")
            .field("provider_name", &self.provider_name())
            .finish()
    }
}
