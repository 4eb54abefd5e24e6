//! Outbound HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

use crate::relay::request::OutboundRequestSpec;

/// Raw partner response: status plus body text.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// A call that never produced a complete response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("no response within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Unavailable(String),
}

/// Executes outbound partner calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn execute(&self, request: &OutboundRequestSpec) -> Result<UpstreamResponse, TransportError>;
}

/// `reqwest`-backed client; one instance shares its connection pool across calls.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn execute(&self, request: &OutboundRequestSpec) -> Result<UpstreamResponse, TransportError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout)
            } else {
                TransportError::Unavailable(e.to_string())
            }
        };

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        Ok(UpstreamResponse { status, body })
    }
}
