use crate::{Relay, RelayError, RelayResponse};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use std::sync::Arc;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

pub fn router(relay: Arc<Relay>) -> Router {
    let body_limit = relay.config().max_body_bytes;

    Router::new()
        .route("/", post(remove_background).options(preflight))
        .route("/remove-bg", post(remove_background).options(preflight))
        .route(
            "/functions/v1/remove-bg",
            post(remove_background).options(preflight),
        )
        .route("/health", get(health))
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(relay)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::map_response(with_cors_headers))
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    RouteError(StatusCode::NOT_FOUND, "Not found").into_response()
}

async fn method_not_allowed() -> Response {
    RouteError(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}

async fn remove_background(
    State(relay): State<Arc<Relay>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    // a missing key wins over any body rejection
    if relay.config().credential.is_none() {
        log::warn!("remove-bg: {}", RelayError::MissingCredential);
        return Err(RelayError::MissingCredential);
    }

    let body = body.map_err(|e| {
        log::warn!("remove-bg: unreadable body: {e}");
        RelayError::invalid_request(e.body_text())
    })?;

    match relay.handle(&body).await {
        Ok(response) => {
            log::info!(
                "remove-bg: ok, {} byte request, {} byte result",
                body.len(),
                response.result_url.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            match &e {
                RelayError::UpstreamError {
                    status: Some(status),
                    ..
                } => log::warn!("remove-bg: upstream status {status}: {e}"),
                _ => log::warn!("remove-bg: {} {e}", e.status_code()),
            }
            Err(e)
        }
    }
}

// Error shape for routing failures that are not part of the relay taxonomy.
struct RouteError(StatusCode, &'static str);

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let body = crate::ErrorBody {
            error: self.1.to_string(),
        };
        (self.0, Json(body)).into_response()
    }
}
