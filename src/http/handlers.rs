//! Request handlers for the relay routes.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::{AuthError, CredentialSnapshot};
use crate::catalog::CatalogQuery;
use crate::http::server::AppState;
use crate::relay::{FlightOperation, InboundRequest, Partner, RelayError, RelayOutcome};

/// Route prefix stripped from hotel relay paths.
pub const HOTEL_PREFIX: &str = "/api/cleartrip/";

/// `/api/cleartrip/{*path}`: relay to the hotel partner.
///
/// The path is taken from the raw URI so escapes such as `%2F` reach the
/// partner unchanged.
pub async fn hotel_relay(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> RelayOutcome {
    let path = uri.path().strip_prefix(HOTEL_PREFIX).unwrap_or_default();
    let request = InboundRequest::new(Partner::Hotel, method, path)
        .with_raw_query(uri.query())
        .with_headers(headers)
        .with_body(body);
    state.dispatcher.relay(request).await
}

/// `/api/flights/{operation}`: credential operations or relay to the flight partner.
pub async fn flight_relay(
    State(state): State<AppState>,
    method: Method,
    Path(operation): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(op) = FlightOperation::resolve(&operation, &method) else {
        tracing::debug!(operation = %operation, method = %method, "Unknown flight operation");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "unknown_flight_operation",
                "operation": operation,
                "method": method.as_str(),
            })),
        )
            .into_response();
    };

    if op.is_credential_operation() {
        let credentials = state.dispatcher.credentials();
        let result = if op == FlightOperation::Login {
            credentials.force_login().await
        } else {
            credentials.force_refresh().await
        };
        return credential_response(result);
    }

    let request = InboundRequest::new(Partner::Flight, method, op.upstream_path())
        .with_raw_query(uri.query())
        .with_headers(headers)
        .with_body(body);
    state.dispatcher.relay(request).await.into_response()
}

fn credential_response(result: Result<CredentialSnapshot, AuthError>) -> Response {
    match result {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({ "authenticated": true, "token": snapshot })),
        )
            .into_response(),
        Err(e) => RelayError::from(e).into_outcome().into_response(),
    }
}

/// `/api/catalog/locations`: filtered catalog lookup.
pub async fn catalog_locations(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let Some(catalog) = &state.catalog else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "catalog_not_configured",
                "message": "No catalog database is configured",
            })),
        )
            .into_response();
    };

    match catalog.query(&query).await {
        Ok(rows) => Json(json!({
            "count": rows.len(),
            "limit": query.limit(),
            "offset": query.offset(),
            "results": rows,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, ?query, "Catalog query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "catalog_query_failed",
                    "message": "Catalog lookup failed",
                })),
            )
                .into_response()
        }
    }
}

pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "path": uri.path() })),
    )
        .into_response()
}
