//! Firewall/CDN hybrid purge client.
//!
//! The provider fronts both a WAF and an edge cache behind one gateway
//! API. Its credential group is validated with the shared all-or-none
//! rule before any call is attempted; [`crate::config::ProviderSetting`]
//! only constructs this client for a complete group.

use std::time::Duration;

use serde::Deserialize;

use crate::config::FirewallConfig;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;

const PROVIDER_NAME: &str = "Firewall CDN";

/// HTTP timeout for token and purge calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Render the purge request body for a path list.
pub fn purge_items(site_id: &str, urls: &[String], recursive: bool) -> serde_json::Value {
    let items: Vec<serde_json::Value> = urls
        .iter()
        .map(|u| {
            serde_json::json!({
                "site_id": site_id,
                "url": vellum_core::paths::normalize(u),
                "recursive": recursive,
            })
        })
        .collect();
    serde_json::json!({ "items": items })
}

/// Gateway purge client. Construction implies a complete credential group.
pub struct FirewallCdnClient {
    config: FirewallConfig,
    client: reqwest::Client,
}

impl FirewallCdnClient {
    pub fn new(config: FirewallConfig) -> Self {
        debug_assert!(
            matches!(
                config.validate(),
                Ok(vellum_core::validation::FieldGroup::Complete)
            ),
            "FirewallCdnClient requires a complete credential group"
        );
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    fn field(&self, value: &Option<String>) -> String {
        // Fields are guaranteed populated by the all-or-none gate.
        value.clone().unwrap_or_default()
    }

    async fn acquire_token(&self) -> Result<String, reqwest::Error> {
        let token_url = format!(
            "https://{}/identity/v1/oauth2/token",
            self.field(&self.config.api_host)
        );
        let response = self
            .client
            .post(&token_url)
            .json(&serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": self.field(&self.config.client_id),
                "client_secret": self.field(&self.config.client_secret),
            }))
            .send()
            .await?
            .error_for_status()?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn send_purge(&self, body: serde_json::Value) -> PurgeResult {
        let token = match self.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, error = %e, "Token acquisition failed");
                return PurgeResult::failed(PROVIDER_NAME, format!("Token acquisition failed: {e}"));
            }
        };

        let purge_url = format!(
            "https://{}/cdn/v1/stacks/{}/purge",
            self.field(&self.config.api_host),
            self.field(&self.config.stack_id)
        );

        match self
            .client
            .post(&purge_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let payload: serde_json::Value = response.json().await.unwrap_or_default();
                let operation_id = payload
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);

                if status.is_success() {
                    let mut result =
                        PurgeResult::ok(PROVIDER_NAME, status.as_u16(), "Purge accepted");
                    if let Some(id) = operation_id {
                        result = result.with_operation_id(id);
                    }
                    result
                } else {
                    PurgeResult::failed(PROVIDER_NAME, format!("Purge rejected: HTTP {status}"))
                        .with_status(status.as_u16())
                }
            }
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, error = %e, "Purge request failed");
                PurgeResult::failed(PROVIDER_NAME, format!("Purge request failed: {e}"))
            }
        }
    }
}

#[async_trait::async_trait]
impl CdnProvider for FirewallCdnClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        let site_id = self.field(&self.config.site_id);
        vec![self.send_purge(purge_items(&site_id, urls, false)).await]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        let site_id = self.field(&self.config.site_id);
        vec![
            self.send_purge(purge_items(&site_id, &["/".to_string()], true))
                .await,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_carry_site_and_normalized_urls() {
        let body = purge_items("site-1", &["news/today".to_string()], false);
        assert_eq!(body["items"][0]["site_id"], "site-1");
        assert_eq!(body["items"][0]["url"], "/news/today");
        assert_eq!(body["items"][0]["recursive"], false);
    }

    #[test]
    fn recursive_root_for_purge_all() {
        let body = purge_items("site-1", &["/".to_string()], true);
        assert_eq!(body["items"][0]["url"], "/");
        assert_eq!(body["items"][0]["recursive"], true);
    }
}
