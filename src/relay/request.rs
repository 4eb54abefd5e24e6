//! Inbound request description and outbound request construction.
//!
//! # Responsibilities
//! - Parse the inbound body as JSON for body-carrying methods
//! - Join the partner base URL with the relative path
//! - Forward the inbound query string byte for byte
//!
//! # Design Decisions
//! - An unparsable body is dropped, never fatal to the call
//! - Path and query stay percent-encoded end to end; nothing is decoded
//!   and re-encoded on the way through
//! - The outbound spec is built once and not mutated afterwards

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde_json::Value;
use url::Url;

use crate::relay::error::RelayError;
use crate::relay::Partner;

/// Everything the relay needs to know about an inbound call.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub partner: Partner,
    pub method: Method,
    /// Path relative to the partner base URL, still percent-encoded.
    pub path: String,
    /// Inbound query string exactly as received, without the `?`.
    pub raw_query: Option<String>,
    pub body: Bytes,
    pub headers: HeaderMap,
}

impl InboundRequest {
    pub fn new(partner: Partner, method: Method, path: impl Into<String>) -> Self {
        Self {
            partner,
            method,
            path: path.into(),
            raw_query: None,
            body: Bytes::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_raw_query(mut self, raw_query: Option<&str>) -> Self {
        self.raw_query = raw_query.filter(|q| !q.is_empty()).map(str::to_string);
        self
    }

    /// Decoded query pairs in arrival order; keys may repeat.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        parse_query(self.raw_query.as_deref())
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Inbound request ID assigned by the HTTP middleware, for logging.
    pub fn request_id(&self) -> &str {
        self.headers
            .get(crate::headers::X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// A fully built outbound partner call.
#[derive(Debug, Clone)]
pub struct OutboundRequestSpec {
    pub method: Method,
    /// Target URL, query string included.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Methods whose inbound body is forwarded.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Parse the inbound body, dropping anything that is not JSON.
pub fn parse_body(method: &Method, body: &[u8]) -> Option<Value> {
    if !carries_body(method) || body.is_empty() {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, bytes = body.len(), "Inbound body is not JSON, relaying without body");
            None
        }
    }
}

/// Join a partner base URL and a relative path with exactly one `/`, then
/// attach `raw_query` unchanged.
pub fn build_url(base_url: &str, path: &str, raw_query: Option<&str>) -> Result<Url, RelayError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|e| RelayError::Internal(format!("invalid upstream URL '{}': {}", joined, e)))?;
    url.set_query(raw_query.filter(|q| !q.is_empty()));
    Ok(url)
}

/// Split a raw query string into decoded, ordered pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_parsed_for_post_and_put() {
        let body = br#"{"city":"goa"}"#;
        assert_eq!(parse_body(&Method::POST, body), Some(json!({"city": "goa"})));
        assert_eq!(parse_body(&Method::PUT, body), Some(json!({"city": "goa"})));
        assert_eq!(parse_body(&Method::GET, body), None);
        assert_eq!(parse_body(&Method::DELETE, body), None);
    }

    #[test]
    fn test_malformed_body_is_dropped() {
        assert_eq!(parse_body(&Method::POST, b"{not json"), None);
        assert_eq!(parse_body(&Method::POST, b""), None);
    }

    #[test]
    fn test_build_url_normalizes_slashes() {
        let url = build_url("https://api.cleartrip.com/", "/hotels/api/v1/search", None).unwrap();
        assert_eq!(url.as_str(), "https://api.cleartrip.com/hotels/api/v1/search");

        let url = build_url("https://api.cleartrip.com", "hotels/api/v1/search", Some("")).unwrap();
        assert_eq!(url.as_str(), "https://api.cleartrip.com/hotels/api/v1/search");
    }

    #[test]
    fn test_build_url_keeps_encoding_and_raw_query() {
        let url = build_url(
            "https://api.cleartrip.com",
            "hotels/a%2Fb/content%3Fsearch=1",
            Some("flag&q=a,b&r=x%2By&q=c"),
        )
        .unwrap();
        assert_eq!(url.path(), "/hotels/a%2Fb/content%3Fsearch=1");
        assert_eq!(url.query(), Some("flag&q=a,b&r=x%2By&q=c"));
    }

    #[test]
    fn test_build_url_rejects_missing_base() {
        assert!(matches!(
            build_url("", "/flights/search", None),
            Err(RelayError::Internal(_))
        ));
    }

    #[test]
    fn test_inbound_query_pairs_decode_raw_query() {
        let request = InboundRequest::new(Partner::Hotel, Method::GET, "hotels")
            .with_raw_query(Some("b=2&a=1&b=3"));
        assert_eq!(request.raw_query.as_deref(), Some("b=2&a=1&b=3"));
        assert_eq!(request.query_pairs().len(), 3);

        let empty = InboundRequest::new(Partner::Hotel, Method::GET, "hotels").with_raw_query(Some(""));
        assert!(empty.raw_query.is_none());
    }

    #[test]
    fn test_parse_query_keeps_order_and_repeats() {
        let query = parse_query(Some("b=2&a=1&b=3&name=new%20delhi"));
        assert_eq!(
            query,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
                ("name".to_string(), "new delhi".to_string()),
            ]
        );
        assert!(parse_query(None).is_empty());
    }
}
