//! Purge call outcome record.

use serde::Serialize;
use vellum_core::types::Timestamp;

/// Outcome of one purge call against one provider.
///
/// Returned synchronously to the caller for logging; never persisted by
/// this subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResult {
    /// Presentational provider name (e.g. `"Cloudflare"`), never used for
    /// dispatch branching.
    pub provider: String,
    pub success: bool,
    /// HTTP status of the provider response, when one was received.
    pub status_code: Option<u16>,
    /// Provider-assigned operation or request id, when one was returned.
    pub operation_id: Option<String>,
    /// Human-readable explanation for logs.
    pub reason: String,
    /// When the purge is expected to have fully propagated.
    pub estimated_completion: Option<Timestamp>,
}

impl PurgeResult {
    /// A successful call.
    pub fn ok(provider: &str, status_code: u16, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            success: true,
            status_code: Some(status_code),
            operation_id: None,
            reason: reason.into(),
            estimated_completion: None,
        }
    }

    /// A failed call. Provider clients catch their own transport and auth
    /// errors and return this instead of propagating.
    pub fn failed(provider: &str, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            success: false,
            status_code: None,
            operation_id: None,
            reason: reason.into(),
            estimated_completion: None,
        }
    }

    /// Attach the HTTP status observed on a failure.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Attach the provider-assigned operation id.
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Attach the estimated propagation instant.
    pub fn with_estimated_completion(mut self, at: Timestamp) -> Self {
        self.estimated_completion = Some(at);
        self
    }
}
