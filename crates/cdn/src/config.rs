//! Provider configuration: tagged kind plus opaque per-provider payload.
//!
//! The database stores `provider_kind` as text and the credentials as a
//! JSON blob; this module deserializes the blob into the typed config for
//! the tagged kind and constructs the matching client.

use serde::Deserialize;
use vellum_core::error::CoreError;
use vellum_core::validation::{require_all_or_none, FieldGroup};

use crate::provider::CdnProvider;
use crate::providers::azure::{AzureCdnClient, AzureEndpointKind};
use crate::providers::cloudflare::CloudflareClient;
use crate::providers::cloudfront::CloudFrontClient;
use crate::providers::fastly::FastlyClient;
use crate::providers::firewall::FirewallCdnClient;

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// Tagged provider kind, matching the `provider_kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    AzureEdge,
    AzureFrontDoor,
    Cloudflare,
    CloudFront,
    Fastly,
    FirewallCdn,
    /// Explicitly no CDN integration; a valid, common configuration.
    None,
}

impl ProviderKind {
    /// The database tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::AzureEdge => "azure_edge",
            Self::AzureFrontDoor => "azure_front_door",
            Self::Cloudflare => "cloudflare",
            Self::CloudFront => "cloudfront",
            Self::Fastly => "fastly",
            Self::FirewallCdn => "firewall_cdn",
            Self::None => "none",
        }
    }

    /// Parse the database tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "azure_edge" => Some(Self::AzureEdge),
            "azure_front_door" => Some(Self::AzureFrontDoor),
            "cloudflare" => Some(Self::Cloudflare),
            "cloudfront" => Some(Self::CloudFront),
            "fastly" => Some(Self::Fastly),
            "firewall_cdn" => Some(Self::FirewallCdn),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed per-provider payloads
// ---------------------------------------------------------------------------

/// Credentials and resource identifiers for Azure CDN / Front Door.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub profile_name: String,
    pub endpoint_name: String,
}

/// Zone-scoped bearer token for the Cloudflare v4 API.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    pub api_token: String,
    pub zone_id: String,
}

fn default_cloudfront_region() -> String {
    // CloudFront control-plane requests are signed against us-east-1.
    "us-east-1".to_string()
}

/// Signing credentials and distribution id for CloudFront invalidations.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudFrontConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub distribution_id: String,
    #[serde(default = "default_cloudfront_region")]
    pub region: String,
}

/// Service-scoped token for the Fastly API.
#[derive(Debug, Clone, Deserialize)]
pub struct FastlyConfig {
    pub api_token: String,
    pub service_id: String,
    /// Public origin the service fronts, e.g. `https://www.example.com`.
    /// Path purges go to the literal asset URL under this origin.
    pub base_url: String,
    /// Mark-stale instead of hard-evict.
    #[serde(default)]
    pub soft_purge: bool,
}

/// Firewall/CDN hybrid credentials. All fields optional so the
/// all-or-none rule can distinguish "off" from "half-configured".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirewallConfig {
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
}

impl FirewallConfig {
    /// Apply the all-or-none rule to the credential group.
    ///
    /// `FieldGroup::Empty` means the provider is simply not configured.
    pub fn validate(&self) -> Result<FieldGroup, CoreError> {
        require_all_or_none(&[
            ("api_host", self.api_host.is_some()),
            ("client_id", self.client_id.is_some()),
            ("client_secret", self.client_secret.is_some()),
            ("stack_id", self.stack_id.is_some()),
            ("site_id", self.site_id.is_some()),
        ])
    }
}

// ---------------------------------------------------------------------------
// ProviderSetting
// ---------------------------------------------------------------------------

/// Error turning a stored setting into a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown provider kind: {0}")]
    UnknownKind(String),

    #[error("Invalid {kind} config payload: {source}")]
    Payload {
        kind: &'static str,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] CoreError),
}

/// One tenant-scoped provider configuration: the tagged kind plus the
/// opaque JSON payload.
#[derive(Debug, Clone)]
pub struct ProviderSetting {
    pub kind: ProviderKind,
    pub config: serde_json::Value,
}

impl ProviderSetting {
    /// Build a setting from the raw database row values.
    pub fn from_row(kind_tag: &str, config: serde_json::Value) -> Result<Self, ConfigError> {
        let kind = ProviderKind::parse(kind_tag)
            .ok_or_else(|| ConfigError::UnknownKind(kind_tag.to_string()))?;
        Ok(Self { kind, config })
    }

    /// Construct the wire client for this setting.
    ///
    /// Returns `Ok(None)` for kinds that need no client (`None`, or a
    /// firewall config whose credential group is entirely blank).
    pub fn build_client(&self) -> Result<Option<Box<dyn CdnProvider>>, ConfigError> {
        fn payload<T: serde::de::DeserializeOwned>(
            kind: &'static str,
            value: &serde_json::Value,
        ) -> Result<T, ConfigError> {
            serde_json::from_value(value.clone())
                .map_err(|source| ConfigError::Payload { kind, source })
        }

        match self.kind {
            ProviderKind::None => Ok(None),
            ProviderKind::AzureEdge => {
                let config: AzureConfig = payload("azure_edge", &self.config)?;
                Ok(Some(Box::new(AzureCdnClient::new(
                    config,
                    AzureEndpointKind::CdnEndpoint,
                ))))
            }
            ProviderKind::AzureFrontDoor => {
                let config: AzureConfig = payload("azure_front_door", &self.config)?;
                Ok(Some(Box::new(AzureCdnClient::new(
                    config,
                    AzureEndpointKind::FrontDoor,
                ))))
            }
            ProviderKind::Cloudflare => {
                let config: CloudflareConfig = payload("cloudflare", &self.config)?;
                Ok(Some(Box::new(CloudflareClient::new(config))))
            }
            ProviderKind::CloudFront => {
                let config: CloudFrontConfig = payload("cloudfront", &self.config)?;
                Ok(Some(Box::new(CloudFrontClient::new(config))))
            }
            ProviderKind::Fastly => {
                let config: FastlyConfig = payload("fastly", &self.config)?;
                Ok(Some(Box::new(FastlyClient::new(config))))
            }
            ProviderKind::FirewallCdn => {
                let config: FirewallConfig = payload("firewall_cdn", &self.config)?;
                match config.validate()? {
                    FieldGroup::Empty => Ok(None),
                    FieldGroup::Complete => Ok(Some(Box::new(FirewallCdnClient::new(config)))),
                }
            }
        }
    }
}
