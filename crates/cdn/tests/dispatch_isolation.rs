//! Provider isolation: one provider's failure or slowness never drops
//! another provider's result from the same dispatch call.

use async_trait::async_trait;
use std::time::Duration;

use vellum_cdn::dispatcher::fan_out;
use vellum_cdn::{CdnProvider, PurgeResult};

struct HealthyProvider;

#[async_trait]
impl CdnProvider for HealthyProvider {
    fn provider_name(&self) -> &str {
        "Healthy"
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        vec![PurgeResult::ok(
            "Healthy",
            202,
            format!("purged {} paths", urls.len()),
        )]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        vec![PurgeResult::ok("Healthy", 202, "purged everything")]
    }
}

/// Simulates a provider whose transport layer timed out: the client caught
/// it internally and surfaced a failure-flagged result, slowly.
struct TimedOutProvider;

#[async_trait]
impl CdnProvider for TimedOutProvider {
    fn provider_name(&self) -> &str {
        "TimedOut"
    }

    async fn purge(&self, _urls: &[String]) -> Vec<PurgeResult> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        vec![PurgeResult::failed("TimedOut", "request timed out after 10s")]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        vec![PurgeResult::failed("TimedOut", "request timed out after 10s")]
    }
}

#[tokio::test]
async fn failing_provider_does_not_hide_healthy_result() {
    let clients: Vec<Box<dyn CdnProvider>> =
        vec![Box::new(TimedOutProvider), Box::new(HealthyProvider)];
    let urls = vec!["/a".to_string(), "/b".to_string()];

    let results = fan_out(&clients, Some(&urls)).await;

    assert_eq!(results.len(), 2);
    let healthy = results.iter().find(|r| r.provider == "Healthy").unwrap();
    assert!(healthy.success);
    assert_eq!(healthy.status_code, Some(202));
    let timed_out = results.iter().find(|r| r.provider == "TimedOut").unwrap();
    assert!(!timed_out.success);
    assert!(timed_out.reason.contains("timed out"));
}

#[tokio::test]
async fn purge_all_fans_out_to_every_provider() {
    let clients: Vec<Box<dyn CdnProvider>> =
        vec![Box::new(HealthyProvider), Box::new(TimedOutProvider)];

    let results = fan_out(&clients, None).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|r| r.provider == "Healthy" && r.success));
    assert!(results.iter().any(|r| r.provider == "TimedOut" && !r.success));
}
