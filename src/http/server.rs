//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, timeouts, body limit)
//! - Render middleware and framework rejections as JSON
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::catalog::CatalogStore;
use crate::config::RelayConfig;
use crate::http::{handlers, status};
use crate::relay::RelayDispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub dispatcher: Arc<RelayDispatcher>,
    pub catalog: Option<Arc<dyn CatalogStore>>,
}

impl AppState {
    pub fn new(
        config: RelayConfig,
        dispatcher: Arc<RelayDispatcher>,
        catalog: Option<Arc<dyn CatalogStore>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
            catalog,
        }
    }
}

/// Rewrite non-JSON error responses (408 from the timeout layer, 413 from
/// the body limit, 405 from the router) into the relay's JSON error shape.
async fn json_rejections(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (error, message) = match status {
        StatusCode::REQUEST_TIMEOUT => ("request_timeout", "Request did not complete in time"),
        StatusCode::PAYLOAD_TOO_LARGE => ("payload_too_large", "Request body exceeds the configured limit"),
        StatusCode::METHOD_NOT_ALLOWED => ("method_not_allowed", "Method not allowed for this route"),
        _ => ("http_error", status.canonical_reason().unwrap_or("Request failed")),
    };
    tracing::debug!(status = status.as_u16(), error, "Rewriting rejection as JSON");

    let mut rewritten = (status, Json(json!({ "error": error, "message": message }))).into_response();
    // Keep middleware headers such as x-request-id.
    for (name, value) in response.headers() {
        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeouts = &state.config.timeouts;
        // Room for a login plus the slowest relayed call before the inbound deadline.
        let inbound_deadline = Duration::from_secs(
            timeouts.auth_secs + timeouts.request_secs.max(timeouts.content_secs) + 5,
        );
        let max_body = state.config.limits.max_body_bytes;

        Router::new()
            .route("/", get(status::root))
            .route("/health", get(status::health))
            .route("/api/status", get(status::status))
            .route(
                "/api/cleartrip/{*path}",
                get(handlers::hotel_relay)
                    .post(handlers::hotel_relay)
                    .put(handlers::hotel_relay)
                    .delete(handlers::hotel_relay)
                    .patch(handlers::hotel_relay),
            )
            .route(
                "/api/flights/{operation}",
                get(handlers::flight_relay).post(handlers::flight_relay),
            )
            .route("/api/catalog/locations", get(handlers::catalog_locations))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(max_body))
            .layer(TimeoutLayer::new(inbound_deadline))
            .layer(middleware::map_response(json_rejections))
            .layer(CorsLayer::permissive())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process tests.
    pub fn into_router(self) -> Router {
        self.router
    }
}
