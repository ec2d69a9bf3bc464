//! CloudFront invalidation client.
//!
//! No static token here: every request is built and signed from scratch
//! with the SigV4 derived-key scheme ([`crate::sigv4`]). The purge body is
//! an XML invalidation batch listing the paths plus a unique caller
//! reference (timestamp + random value) so retried requests stay
//! idempotent from the provider's perspective.

use std::time::Duration;

use chrono::Utc;

use crate::config::CloudFrontConfig;
use crate::provider::CdnProvider;
use crate::result::PurgeResult;
use crate::sigv4;

const PROVIDER_NAME: &str = "CloudFront";

const CLOUDFRONT_HOST: &str = "cloudfront.amazonaws.com";

/// Control-plane API version baked into the request path.
const API_VERSION: &str = "2020-05-31";

/// HTTP timeout for invalidation calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// CloudFront's documented propagation window.
const ESTIMATED_PROPAGATION_MINS: i64 = 15;

/// Escape the XML-significant characters in a path.
fn xml_escape(path: &str) -> String {
    path.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the invalidation batch body.
pub fn invalidation_batch(paths: &[String], caller_reference: &str) -> String {
    let mut items = String::new();
    for path in paths {
        items.push_str("<Path>");
        items.push_str(&xml_escape(path));
        items.push_str("</Path>");
    }
    format!(
        "<InvalidationBatch xmlns=\"http://cloudfront.amazonaws.com/doc/{API_VERSION}/\">\
         <Paths><Quantity>{}</Quantity><Items>{items}</Items></Paths>\
         <CallerReference>{caller_reference}</CallerReference>\
         </InvalidationBatch>",
        paths.len()
    )
}

/// Unique caller-supplied correlation token: timestamp plus a random value.
fn new_caller_reference() -> String {
    format!(
        "vellum-{}-{:08x}",
        Utc::now().format("%Y%m%dT%H%M%SZ"),
        rand::random::<u32>()
    )
}

/// Pull the `<Id>` element out of the invalidation response, if present.
fn extract_invalidation_id(body: &str) -> Option<String> {
    let start = body.find("<Id>")? + "<Id>".len();
    let end = body[start..].find("</Id>")? + start;
    Some(body[start..end].to_string())
}

/// SigV4-signed invalidation client.
pub struct CloudFrontClient {
    config: CloudFrontConfig,
    client: reqwest::Client,
}

impl CloudFrontClient {
    pub fn new(config: CloudFrontConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    async fn create_invalidation(&self, paths: &[String]) -> PurgeResult {
        let uri = format!(
            "/{API_VERSION}/distribution/{}/invalidation",
            self.config.distribution_id
        );
        let body = invalidation_batch(paths, &new_caller_reference());

        let signed = sigv4::sign(&sigv4::SigningParams {
            access_key_id: &self.config.access_key_id,
            secret_access_key: &self.config.secret_access_key,
            region: &self.config.region,
            service: "cloudfront",
            method: "POST",
            host: CLOUDFRONT_HOST,
            uri: &uri,
            query: "",
            payload: body.as_bytes(),
            timestamp: Utc::now(),
        });

        let response = match self
            .client
            .post(format!("https://{CLOUDFRONT_HOST}{uri}"))
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .header("authorization", &signed.authorization)
            .header("content-type", "text/xml")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = PROVIDER_NAME, error = %e, "Invalidation request failed");
                return PurgeResult::failed(
                    PROVIDER_NAME,
                    format!("Invalidation request failed: {e}"),
                );
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            let mut result = PurgeResult::ok(
                PROVIDER_NAME,
                status.as_u16(),
                format!("Invalidation of {} path(s) created", paths.len()),
            )
            .with_estimated_completion(
                Utc::now() + chrono::Duration::minutes(ESTIMATED_PROPAGATION_MINS),
            );
            if let Some(id) = extract_invalidation_id(&text) {
                result = result.with_operation_id(id);
            }
            result
        } else {
            PurgeResult::failed(PROVIDER_NAME, format!("Invalidation rejected: HTTP {status}"))
                .with_status(status.as_u16())
        }
    }
}

#[async_trait::async_trait]
impl CdnProvider for CloudFrontClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn purge(&self, urls: &[String]) -> Vec<PurgeResult> {
        vec![self.create_invalidation(urls).await]
    }

    async fn purge_all(&self) -> Vec<PurgeResult> {
        vec![self.create_invalidation(&["/*".to_string()]).await]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_lists_paths_and_quantity() {
        let body = invalidation_batch(&["/a".to_string(), "/b".to_string()], "ref-1");
        assert!(body.contains("<Quantity>2</Quantity>"));
        assert!(body.contains("<Path>/a</Path><Path>/b</Path>"));
        assert!(body.contains("<CallerReference>ref-1</CallerReference>"));
    }

    #[test]
    fn paths_are_xml_escaped() {
        let body = invalidation_batch(&["/a&b<c>".to_string()], "ref");
        assert!(body.contains("<Path>/a&amp;b&lt;c&gt;</Path>"));
    }

    #[test]
    fn caller_references_are_unique() {
        assert_ne!(new_caller_reference(), new_caller_reference());
    }

    #[test]
    fn invalidation_id_extraction() {
        let body = "<Invalidation><Id>I2J0I21XWM63QP</Id><Status>InProgress</Status></Invalidation>";
        assert_eq!(
            extract_invalidation_id(body),
            Some("I2J0I21XWM63QP".to_string())
        );
        assert_eq!(extract_invalidation_id("<nothing/>"), None);
    }
}
