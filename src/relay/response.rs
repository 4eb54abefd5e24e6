//! Partner response mapping.
//!
//! # Responsibilities
//! - Pass JSON bodies through with the partner status
//! - Wrap non-JSON bodies in a diagnostic envelope
//! - Render every outcome as a JSON HTTP response
//!
//! # Design Decisions
//! - A success status with an unparsable body is escalated to 500
//! - Error statuses keep their code; only the body is wrapped

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Maximum characters of a non-JSON body copied into the envelope.
pub const MAX_RAW_BODY_CHARS: usize = 500;

/// What kind of body the outcome carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    NonJson,
    TransportFailure,
}

/// Result of one relayed call, ready to send to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayOutcome {
    pub status: StatusCode,
    pub body: Value,
    pub kind: ContentKind,
}

impl RelayOutcome {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            kind: ContentKind::Json,
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Map a partner status and body text to an outcome.
pub fn map_upstream_response(status: StatusCode, body: &str) -> RelayOutcome {
    if body.trim().is_empty() {
        return RelayOutcome::json(status, json!({}));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => RelayOutcome::json(status, value),
        Err(_) => {
            let reported = if status.is_client_error() || status.is_server_error() {
                status
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            RelayOutcome {
                status: reported,
                body: json!({
                    "error": "non_json_upstream_response",
                    "upstream_status": status.as_u16(),
                    "body": truncate(body, MAX_RAW_BODY_CHARS),
                }),
                kind: ContentKind::NonJson,
            }
        }
    }
}

/// First `max` characters of `text`, split on a char boundary.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
