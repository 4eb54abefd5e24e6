//! Flight partner token endpoint.
//!
//! # Responsibilities
//! - Exchange account credentials for a bearer token (login)
//! - Exchange a refresh token for a new bearer token (refresh)
//! - Classify failures: rejection, timeout, transport, malformed body

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::FlightPartnerConfig;

/// Token lifetime assumed when the partner omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Errors raised while obtaining a flight token.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The partner answered with a non-success status.
    #[error("Flight partner rejected credentials with status {status}")]
    Rejected { status: u16, body: Value },

    #[error("Token endpoint timed out after {0} seconds")]
    Timeout(u64),

    #[error("Token endpoint unreachable: {0}")]
    Transport(String),

    #[error("Malformed token response: {0}")]
    Malformed(String),
}

/// A token issued by the partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Duration,
}

/// Seam between the credential manager and the partner's auth API.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Full login with the configured account credentials.
    async fn login(&self) -> Result<TokenGrant, AuthError>;

    /// Exchange a refresh token for a new grant.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "accessToken", alias = "token")]
    access_token: String,
    #[serde(default, alias = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(default, alias = "expiresIn")]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_grant(self) -> Result<TokenGrant, AuthError> {
        if self.access_token.is_empty() {
            return Err(AuthError::Malformed("empty access token".to_string()));
        }
        Ok(TokenGrant {
            access_token: self.access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expires_in: Duration::from_secs(self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS)),
        })
    }
}

/// Token endpoint backed by the flight partner's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    client: reqwest::Client,
    config: FlightPartnerConfig,
    timeout: Duration,
}

impl HttpTokenEndpoint {
    pub fn new(client: reqwest::Client, config: FlightPartnerConfig, timeout: Duration) -> Self {
        Self {
            client,
            config,
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_for_grant(&self, path: &str, body: Value) -> Result<TokenGrant, AuthError> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<TokenResponse>(&text)
            .map_err(|e| AuthError::Malformed(e.to_string()))?
            .into_grant()
    }

    fn classify(&self, error: reqwest::Error) -> AuthError {
        if error.is_timeout() {
            AuthError::Timeout(self.timeout.as_secs())
        } else {
            AuthError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn login(&self) -> Result<TokenGrant, AuthError> {
        tracing::debug!(username = %self.config.username, tenant_id = %self.config.tenant_id, "Flight login");
        self.post_for_grant(
            "/auth/login",
            json!({
                "username": self.config.username,
                "password": self.config.password,
                "tenant_id": self.config.tenant_id,
            }),
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        self.post_for_grant("/auth/refresh", json!({ "refresh_token": refresh_token }))
            .await
    }
}
