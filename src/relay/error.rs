//! Relay failure taxonomy.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::relay::client::TransportError;
use crate::relay::response::{ContentKind, RelayOutcome};

/// Failures that end a relay call before a partner response can be mapped.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// The flight partner rejected login or refresh credentials.
    #[error("Flight partner authentication failed with status {status}")]
    AuthenticationFailure { status: u16, body: Value },

    #[error("Upstream did not respond within {0} seconds")]
    UpstreamTimeout(u64),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal relay error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Caller-visible status code.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::AuthenticationFailure { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RelayError::AuthenticationFailure { .. } => "authentication_failure",
            RelayError::UpstreamTimeout(_) => "upstream_timeout",
            RelayError::UpstreamUnavailable(_) => "upstream_unavailable",
            RelayError::Internal(_) => "internal_error",
        }
    }

    /// Convert into the JSON outcome sent to the caller.
    pub fn into_outcome(self) -> RelayOutcome {
        let status = self.status();
        let message = self.to_string();
        let code = self.code();

        match self {
            RelayError::AuthenticationFailure {
                status: upstream_status,
                body,
            } => RelayOutcome {
                status,
                body: json!({
                    "error": code,
                    "message": message,
                    "upstream_status": upstream_status,
                    "detail": body,
                }),
                kind: ContentKind::Json,
            },
            _ => RelayOutcome {
                status,
                body: json!({ "error": code, "message": message }),
                kind: ContentKind::TransportFailure,
            },
        }
    }
}

impl From<AuthError> for RelayError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Rejected { status, body } => {
                RelayError::AuthenticationFailure { status, body }
            }
            AuthError::Timeout(secs) => RelayError::UpstreamTimeout(secs),
            AuthError::Transport(message) => RelayError::UpstreamUnavailable(message),
            AuthError::Malformed(message) => {
                RelayError::UpstreamUnavailable(format!("invalid token response: {}", message))
            }
        }
    }
}

impl From<TransportError> for RelayError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout(after) => RelayError::UpstreamTimeout(after.as_secs()),
            TransportError::Unavailable(message) => RelayError::UpstreamUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RelayError::UpstreamTimeout(60).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            RelayError::UpstreamUnavailable("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::AuthenticationFailure {
                status: 401,
                body: Value::Null
            }
            .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_timeout_outcome_is_descriptive() {
        let outcome = RelayError::from(TransportError::Timeout(Duration::from_secs(60))).into_outcome();
        assert_eq!(outcome.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(outcome.body["error"], "upstream_timeout");
        assert_eq!(
            outcome.body["message"],
            "Upstream did not respond within 60 seconds"
        );
        assert_eq!(outcome.kind, ContentKind::TransportFailure);
    }

    #[test]
    fn test_auth_failure_carries_partner_body() {
        let outcome = RelayError::from(AuthError::Rejected {
            status: 403,
            body: json!({"message": "tenant disabled"}),
        })
        .into_outcome();
        assert_eq!(outcome.status, StatusCode::FORBIDDEN);
        assert_eq!(outcome.body["upstream_status"], 403);
        assert_eq!(outcome.body["detail"]["message"], "tenant disabled");
    }
}
