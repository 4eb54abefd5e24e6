//! Relay dispatcher: one inbound call in, one outcome out.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;

use crate::auth::CredentialManager;
use crate::config::HotelPartnerConfig;
use crate::headers::{self, rules::fresh_id, X_CT_API_KEY, X_REQUEST_ID, X_SESSION_ID};
use crate::observability::metrics;
use crate::relay::client::{TransportError, UpstreamClient};
use crate::relay::error::RelayError;
use crate::relay::request::{build_url, parse_body, InboundRequest, OutboundRequestSpec};
use crate::relay::response::{map_upstream_response, truncate, ContentKind, RelayOutcome};
use crate::relay::Partner;
use crate::resilience::TimeoutPolicy;

/// Characters of an outbound body kept in failure logs.
const LOGGED_BODY_CHARS: usize = 300;

/// Headers never written to logs in clear text.
const REDACTED_HEADERS: [&str; 2] = ["authorization", X_CT_API_KEY];

/// Builds, sends and maps partner calls.
pub struct RelayDispatcher {
    client: Arc<dyn UpstreamClient>,
    credentials: Arc<CredentialManager>,
    hotel: HotelPartnerConfig,
    flight_base_url: String,
    timeouts: TimeoutPolicy,
}

impl RelayDispatcher {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        credentials: Arc<CredentialManager>,
        hotel: HotelPartnerConfig,
        flight_base_url: String,
        timeouts: TimeoutPolicy,
    ) -> Self {
        Self {
            client,
            credentials,
            hotel,
            flight_base_url,
            timeouts,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Relay `request` to its partner and map the result. Never fails.
    ///
    /// Every failure is logged where it happens, with the headers and body
    /// prepared up to that point.
    pub async fn relay(&self, request: InboundRequest) -> RelayOutcome {
        let start = Instant::now();
        let partner = request.partner;

        let outcome = self
            .try_relay(&request)
            .await
            .unwrap_or_else(RelayError::into_outcome);

        metrics::record_request(partner.as_str(), outcome.status.as_u16(), start);
        outcome
    }

    async fn try_relay(&self, request: &InboundRequest) -> Result<RelayOutcome, RelayError> {
        let body = parse_body(&request.method, &request.body);

        let mut headers = HeaderMap::new();
        let prepared = match request.partner {
            Partner::Hotel => self
                .hotel_headers(request, &mut headers)
                .map(|()| (self.hotel.base_url.as_str(), None)),
            Partner::Flight => match self.credentials.get_token().await {
                Ok(token) => flight_headers(&token, &request.headers, &mut headers)
                    .map(|()| (self.flight_base_url.as_str(), Some(token))),
                Err(e) => Err(e.into()),
            },
        };

        let (url, bearer) = match prepared.and_then(|(base_url, bearer)| {
            build_url(base_url, &request.path, request.raw_query.as_deref()).map(|url| (url, bearer))
        }) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!(
                    request_id = %request.request_id(),
                    partner = %request.partner,
                    method = %request.method,
                    path = %request.path,
                    headers = %describe_headers(&headers),
                    body = %describe_body(body.as_ref()),
                    error = %e,
                    "Relay failed before the upstream call"
                );
                return Err(e);
            }
        };

        let spec = OutboundRequestSpec {
            method: request.method.clone(),
            url,
            headers,
            body,
            timeout: self.timeouts.for_call(request.partner, &request.path),
        };

        tracing::debug!(
            request_id = %request.request_id(),
            partner = %request.partner,
            method = %spec.method,
            url = %spec.url,
            "Relaying request"
        );

        let response = match self.client.execute(&spec).await {
            Ok(response) => response,
            Err(e) => {
                let kind = match e {
                    TransportError::Timeout(_) => "timeout",
                    TransportError::Unavailable(_) => "unavailable",
                };
                metrics::record_upstream_failure(request.partner.as_str(), kind);
                tracing::error!(
                    request_id = %request.request_id(),
                    method = %spec.method,
                    url = %spec.url,
                    headers = %describe_headers(&spec.headers),
                    body = %describe_body(spec.body.as_ref()),
                    error = %e,
                    "Upstream call failed"
                );
                return Err(e.into());
            }
        };

        if response.status == StatusCode::UNAUTHORIZED {
            if let Some(token) = &bearer {
                self.credentials.invalidate(token).await;
            }
        }

        let outcome = map_upstream_response(response.status, &response.body);
        if outcome.kind == ContentKind::NonJson {
            tracing::warn!(
                request_id = %request.request_id(),
                method = %spec.method,
                url = %spec.url,
                upstream_status = response.status.as_u16(),
                headers = %describe_headers(&spec.headers),
                body = %describe_body(spec.body.as_ref()),
                "Upstream returned a non-JSON body"
            );
        }
        Ok(outcome)
    }

    fn hotel_headers(&self, request: &InboundRequest, headers: &mut HeaderMap) -> Result<(), RelayError> {
        headers.extend(headers::derive_headers(&request.path, request.method.clone()));
        let key = HeaderValue::from_str(&self.hotel.api_key)
            .map_err(|_| RelayError::Internal("hotel API key is not a valid header value".to_string()))?;
        headers.insert(X_CT_API_KEY, key);
        Ok(())
    }
}

/// Headers for a flight partner call.
fn flight_headers(token: &str, inbound: &HeaderMap, headers: &mut HeaderMap) -> Result<(), RelayError> {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(X_REQUEST_ID, fresh_id());
    if let Some(session) = inbound.get(X_SESSION_ID) {
        headers.insert(X_SESSION_ID, session.clone());
    }

    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| RelayError::Internal("flight token is not a valid header value".to_string()))?;
    headers.insert(header::AUTHORIZATION, bearer);
    Ok(())
}

/// `name=value` pairs with credentials masked.
fn describe_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(&name.as_str()) {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}={}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_body(body: Option<&Value>) -> String {
    body.map(|b| truncate(&b.to_string(), LOGGED_BODY_CHARS))
        .unwrap_or_default()
}
