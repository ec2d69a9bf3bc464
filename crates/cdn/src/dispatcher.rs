//! Fan-out of purge requests across every configured provider.
//!
//! One provider's outage must never block the others: clients already
//! return failures as data, and a setting that cannot even be turned into
//! a client contributes a failure-flagged result instead of aborting the
//! loop. Zero configured providers is a valid state and yields an empty
//! result list.

use futures::future::join_all;

use crate::config::ProviderSetting;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;

/// What to ask each provider for.
enum PurgeRequest<'a> {
    Paths(&'a [String]),
    Everything,
}

/// Stateless dispatcher over a tenant's provider settings.
pub struct CdnDispatcher;

impl CdnDispatcher {
    /// Purge the given URL paths through every configured provider.
    ///
    /// The input list is deduplicated before dispatch. Returns one or more
    /// [`PurgeResult`]s per provider.
    pub async fn purge(settings: &[ProviderSetting], urls: &[String]) -> Vec<PurgeResult> {
        let urls = vellum_core::paths::dedupe(urls);
        Self::dispatch(settings, PurgeRequest::Paths(&urls)).await
    }

    /// Flush everything through every configured provider.
    pub async fn purge_all(settings: &[ProviderSetting]) -> Vec<PurgeResult> {
        Self::dispatch(settings, PurgeRequest::Everything).await
    }

    async fn dispatch(settings: &[ProviderSetting], request: PurgeRequest<'_>) -> Vec<PurgeResult> {
        let mut results = Vec::new();
        let mut clients: Vec<Box<dyn CdnProvider>> = Vec::new();

        for setting in settings {
            match setting.build_client() {
                Ok(Some(client)) => clients.push(client),
                // Kind `none` or a blank optional credential group.
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(kind = setting.kind.tag(), error = %e, "Provider config invalid");
                    results.push(PurgeResult::failed(
                        setting.kind.tag(),
                        format!("Invalid configuration: {e}"),
                    ));
                }
            }
        }

        let urls = match request {
            PurgeRequest::Paths(urls) => Some(urls),
            PurgeRequest::Everything => None,
        };
        results.extend(fan_out(&clients, urls).await);
        results
    }
}

/// Invoke every client concurrently and flatten the results.
///
/// `urls` of `None` means purge-all. Provider calls are independent
/// network requests to unrelated services, so they run concurrently; there
/// is no ordering requirement between providers.
pub async fn fan_out(clients: &[Box<dyn CdnProvider>], urls: Option<&[String]>) -> Vec<PurgeResult> {
    let calls = clients.iter().map(|client| async move {
        match urls {
            Some(urls) => client.purge(urls).await,
            None => client.purge_all().await,
        }
    });
    join_all(calls).await.into_iter().flatten().collect()
}
