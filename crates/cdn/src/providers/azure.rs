//! Azure CDN / Front Door purge client.
//!
//! Purging is a long-running operation on the provider side: the client
//! authenticates against Entra ID, starts the purge through the ARM
//! endpoint, and returns as soon as ARM accepts the request, recording the
//! operation id and an estimated completion instant instead of polling.
//!
//! ARM rejects oversized path lists, so a request targeting more than
//! [`MAX_PATHS_PER_PURGE`] paths — or any root/wildcard path — is
//! substituted with a single wildcard purge-all.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::config::AzureConfig;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;

/// ARM caps purge requests well below this; above it we purge everything.
pub const MAX_PATHS_PER_PURGE: usize = 100;

/// Path list that invalidates the whole endpoint.
pub const WILDCARD_PATH: &str = "/*";

/// ARM api-version for Microsoft.Cdn purge operations.
const API_VERSION: &str = "2023-05-01";

/// HTTP timeout for token and purge calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// How long Azure typically takes to propagate a purge.
const ESTIMATED_PROPAGATION_MINS: i64 = 10;

/// Which Microsoft.Cdn resource the profile fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzureEndpointKind {
    /// Classic CDN endpoint (`endpoints/{name}/purge`).
    CdnEndpoint,
    /// Front Door endpoint (`afdEndpoints/{name}/purge`).
    FrontDoor,
}

impl AzureEndpointKind {
    fn display_name(self) -> &'static str {
        match self {
            Self::CdnEndpoint => "Azure CDN",
            Self::FrontDoor => "Azure Front Door",
        }
    }

    fn resource_segment(self) -> &'static str {
        match self {
            Self::CdnEndpoint => "endpoints",
            Self::FrontDoor => "afdEndpoints",
        }
    }
}

/// Decide the effective path list for one purge request.
///
/// Returns the wildcard substitute when the list is too large or already
/// contains a root/wildcard target; otherwise the list unchanged.
pub fn plan_purge_paths(urls: &[String]) -> Vec<String> {
    let escalate = urls.len() > MAX_PATHS_PER_PURGE
        || urls
            .iter()
            .any(|u| u == WILDCARD_PATH || vellum_core::paths::is_root_target(u));
    if escalate {
        vec![WILDCARD_PATH.to_string()]
    } else {
        urls.to_vec()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// ARM purge client shared by the CDN and Front Door kinds.
pub struct AzureCdnClient {
    config: AzureConfig,
    kind: AzureEndpointKind,
    client: reqwest::Client,
}

impl AzureCdnClient {
    pub fn new(config: AzureConfig, kind: AzureEndpointKind) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            config,
            kind,
            client,
        }
    }

    /// ARM resource URL for the purge operation.
    fn purge_url(&self) -> String {
        format!(
            "https://management.azure.com/subscriptions/{}/resourceGroups/{}\
             /providers/Microsoft.Cdn/profiles/{}/{}/{}/purge?api-version={}",
            self.config.subscription_id,
            self.config.resource_group,
            self.config.profile_name,
            self.kind.resource_segment(),
            self.config.endpoint_name,
            API_VERSION,
        )
    }

    /// Client-credentials token for the ARM scope.
    async fn acquire_token(&self) -> Result<String, reqwest::Error> {
        let token_url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.config.tenant_id
        );
        let response = self
            .client
            .post(&token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", "https://management.azure.com/.default"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn start_purge(&self, paths: &[String]) -> PurgeResult {
        let name = self.kind.display_name();

        let token = match self.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(provider = name, error = %e, "Token acquisition failed");
                return PurgeResult::failed(name, format!("Token acquisition failed: {e}"));
            }
        };

        let body = serde_json::json!({ "contentPaths": paths });
        let response = match self
            .client
            .post(self.purge_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = name, error = %e, "Purge request failed");
                return PurgeResult::failed(name, format!("Purge request failed: {e}"));
            }
        };

        let status = response.status();
        let operation_id = response
            .headers()
            .get("x-ms-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // 202 = ARM accepted the long-running operation. That satisfies the
        // dispatch contract; propagation continues provider-side.
        if status.is_success() {
            let mut result = PurgeResult::ok(
                name,
                status.as_u16(),
                format!("Purge of {} path(s) accepted", paths.len()),
            )
            .with_estimated_completion(
                Utc::now() + chrono::Duration::minutes(ESTIMATED_PROPAGATION_MINS),
            );
            if let Some(id) = operation_id {
                result = result.with_operation_id(id);
            }
            result
        } else {
            PurgeResult::failed(name, format!("ARM rejected purge: HTTP {status}"))
                .with_status(status.as_u16())
        }
    }
}

#[async_trait::async_trait]
impl CdnProvider for AzureCdnClient {
    fn provider_name(&self) -> &str {
        self.kind.display_name()
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        let paths = plan_purge_paths(urls);
        vec![self.start_purge(&paths).await]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        vec![self.start_purge(&[WILDCARD_PATH.to_string()]).await]
    }
}
