//! Cloudflare purge client.
//!
//! Token-bearer REST against the v4 zone API. `purge_all` sends the
//! `purge_everything` flag; a path purge sends an explicit file list,
//! except that a list containing the root path (or the case-insensitive
//! `root` token) is escalated to `purge_everything` as well.

use std::time::Duration;

use crate::config::CloudflareConfig;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;

const PROVIDER_NAME: &str = "Cloudflare";

/// HTTP timeout for purge calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body for one purge_cache call.
///
/// Separated from the HTTP call so the escalation rule is testable.
pub fn purge_body(urls: &[String]) -> serde_json::Value {
    if urls.iter().any(|u| vellum_core::paths::is_root_target(u)) {
        serde_json::json!({ "purge_everything": true })
    } else {
        serde_json::json!({ "files": urls })
    }
}

/// Zone-scoped purge client for the Cloudflare v4 API.
pub struct CloudflareClient {
    config: CloudflareConfig,
    client: reqwest::Client,
}

impl CloudflareClient {
    pub fn new(config: CloudflareConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    async fn send_purge(&self, body: serde_json::Value) -> PurgeResult {
        let url = format!(
            "https://api.cloudflare.com/client/v4/zones/{}/purge_cache",
            self.config.zone_id
        );

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, error = %e, "Purge request failed");
                return PurgeResult::failed(PROVIDER_NAME, format!("Purge request failed: {e}"));
            }
        };

        let status = response.status();
        let payload: serde_json::Value = response.json().await.unwrap_or_default();

        let api_success = payload
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        let operation_id = payload
            .pointer("/result/id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        if status.is_success() && api_success {
            let mut result = PurgeResult::ok(PROVIDER_NAME, status.as_u16(), "Purge accepted");
            if let Some(id) = operation_id {
                result = result.with_operation_id(id);
            }
            result
        } else {
            let errors = payload
                .get("errors")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no error detail".to_string());
            PurgeResult::failed(PROVIDER_NAME, format!("Purge rejected: {errors}"))
                .with_status(status.as_u16())
        }
    }
}

#[async_trait::async_trait]
impl CdnProvider for CloudflareClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        vec![self.send_purge(purge_body(urls)).await]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        vec![
            self.send_purge(serde_json::json!({ "purge_everything": true }))
                .await,
        ]
    }
}
