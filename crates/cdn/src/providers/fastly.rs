//! Fastly purge client.
//!
//! Path-level invalidation uses the non-standard `PURGE` HTTP method
//! against the literal asset URL; full flushes go to the dedicated
//! `purge_all` endpoint keyed by the service id. Soft purge (mark-stale
//! instead of hard-evict) is opted into per configuration via the
//! `Fastly-Soft-Purge` header.

use std::time::Duration;

use crate::config::FastlyConfig;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;

const PROVIDER_NAME: &str = "Fastly";

/// HTTP timeout for purge calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The absolute asset URL a path purge is issued against.
pub fn asset_url(base_url: &str, path: &str) -> String {
    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        vellum_core::paths::normalize(path)
    )
}

/// Service-scoped purge client for the Fastly API.
pub struct FastlyClient {
    config: FastlyConfig,
    client: reqwest::Client,
}

impl FastlyClient {
    pub fn new(config: FastlyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Issue one `PURGE` request against a single asset URL.
    async fn purge_one(&self, path: &str) -> PurgeResult {
        let url = asset_url(&self.config.base_url, path);
        let method = reqwest::Method::from_bytes(b"PURGE").expect("PURGE is a valid method token");

        let mut request = self
            .client
            .request(method, &url)
            .header("Fastly-Key", &self.config.api_token);
        if self.config.soft_purge {
            request = request.header("Fastly-Soft-Purge", "1");
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let payload: serde_json::Value = response.json().await.unwrap_or_default();
                let purge_id = payload
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);

                if status.is_success() {
                    let mut result =
                        PurgeResult::ok(PROVIDER_NAME, status.as_u16(), format!("Purged {url}"));
                    if let Some(id) = purge_id {
                        result = result.with_operation_id(id);
                    }
                    result
                } else {
                    PurgeResult::failed(PROVIDER_NAME, format!("Purge of {url} failed: HTTP {status}"))
                        .with_status(status.as_u16())
                }
            }
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, url, error = %e, "Purge request failed");
                PurgeResult::failed(PROVIDER_NAME, format!("Purge of {url} failed: {e}"))
            }
        }
    }
}

#[async_trait::async_trait]
impl CdnProvider for FastlyClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        let mut results = Vec::with_capacity(urls.len());
        for path in urls {
            results.push(self.purge_one(path).await);
        }
        results
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        let url = format!(
            "https://api.fastly.com/service/{}/purge_all",
            self.config.service_id
        );

        let result = match self
            .client
            .post(&url)
            .header("Fastly-Key", &self.config.api_token)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    PurgeResult::ok(PROVIDER_NAME, status.as_u16(), "Service-wide purge accepted")
                } else {
                    PurgeResult::failed(PROVIDER_NAME, format!("Purge-all failed: HTTP {status}"))
                        .with_status(status.as_u16())
                }
            }
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, error = %e, "Purge-all request failed");
                PurgeResult::failed(PROVIDER_NAME, format!("Purge-all failed: {e}"))
            }
        };
        vec![result]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_url_joins_origin_and_path() {
        assert_eq!(
            asset_url("https://www.example.com", "/news/today"),
            "https://www.example.com/news/today"
        );
    }

    #[test]
    fn asset_url_tolerates_trailing_slash_origin() {
        assert_eq!(
            asset_url("https://www.example.com/", "news/today"),
            "https://www.example.com/news/today"
        );
    }

    #[test]
    fn soft_purge_flag_defaults_off() {
        let config: FastlyConfig = serde_json::from_value(serde_json::json!({
            "api_token": "t",
            "service_id": "svc",
            "base_url": "https://www.example.com"
        }))
        .unwrap();
        assert!(!config.soft_purge);
    }
}
