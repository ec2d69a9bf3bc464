//! AWS Signature Version 4 request signing, built from scratch.
//!
//! The CloudFront invalidation API accepts no static token; every request
//! carries a signature derived through the four-step key chain
//! (date -> region -> service -> request scope, each step an HMAC-SHA256
//! over the previous key) applied to a canonical rendering of the request.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Everything needed to sign one request.
pub struct SigningParams<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    pub method: &'a str,
    pub host: &'a str,
    /// Absolute request path, already URI-encoded.
    pub uri: &'a str,
    /// Canonical query string (empty for none).
    pub query: &'a str,
    pub payload: &'a [u8],
    pub timestamp: DateTime<Utc>,
}

/// The headers to attach to the signed request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

/// Headers covered by the signature, in canonical (sorted) order.
const SIGNED_HEADER_LIST: &str = "host;x-amz-content-sha256;x-amz-date";

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Derive the request signing key: date-scoped, then region-scoped, then
/// service-scoped, then request-scoped, each via keyed hashing over the
/// prior key.
pub fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

/// Build the canonical request string: method, path, query, the sorted and
/// lowercased header block, the signed-header list, and the payload hash.
pub fn canonical_request(params: &SigningParams<'_>, amz_date: &str, payload_hash: &str) -> String {
    // host, x-amz-content-sha256, x-amz-date are already in sorted order.
    let canonical_headers = format!(
        "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
        params.host, payload_hash, amz_date
    );
    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        params.method, params.uri, params.query, canonical_headers, SIGNED_HEADER_LIST, payload_hash
    )
}

/// Sign a request, producing the `x-amz-date`, `x-amz-content-sha256`, and
/// `Authorization` header values.
pub fn sign(params: &SigningParams<'_>) -> SignedHeaders {
    let date = params.timestamp.format("%Y%m%d").to_string();
    let amz_date = params.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let scope = format!("{date}/{}/{}/aws4_request", params.region, params.service);

    let payload_hash = sha256_hex(params.payload);
    let canonical = canonical_request(params, &amz_date, &payload_hash);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical.as_bytes())
    );

    let signing_key =
        derive_signing_key(params.secret_access_key, &date, params.region, params.service);
    let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={SIGNED_HEADER_LIST}, Signature={signature}",
        params.access_key_id
    );

    SignedHeaders {
        amz_date,
        content_sha256: payload_hash,
        authorization,
    }
}
