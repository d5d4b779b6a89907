//! Transport bridge between axum and the Melt dispatcher.
//!
//! The server mounts [`dispatch`] as the router's fallback, so every
//! request crosses this bridge: axum request in, Melt request out to the
//! web context, Melt response back into an axum response.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response as AxumResponse;
use tracing::{info, warn};

use melt_web::{HttpMethod, Request, Response, WebContext};

/// Shared state for the fallback service.
#[derive(Clone)]
pub struct DispatchState {
    /// The web application behind this server
    pub context: Arc<WebContext>,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

/// Funnel one axum request through the Melt dispatcher.
pub async fn dispatch(
    State(state): State<DispatchState>,
    request: axum::extract::Request,
) -> AxumResponse {
    let (parts, body) = request.into_parts();

    let method = match HttpMethod::parse(parts.method.as_str()) {
        Some(method) => method,
        None => {
            warn!(method = %parts.method, "unsupported method");
            return into_axum_response(
                Response::text(format!("405 Method Not Allowed: {}", parts.method))
                    .with_status(405),
            );
        }
    };

    let path = parts.uri.path().to_string();
    let raw_query = parts.uri.query().unwrap_or("");

    let body_bytes = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(%error, limit = state.max_body_bytes, "failed to read request body");
            return into_axum_response(
                Response::text("413 Payload Too Large".to_string()).with_status(413),
            );
        }
    };

    let melt_request = Request::new(method, path.clone())
        .with_query(raw_query)
        .with_body(body_bytes.to_vec());

    let response = state.context.dispatch(melt_request);
    info!(%method, path = path.as_str(), status = response.status(), "request");

    into_axum_response(response)
}

/// Convert a Melt response into an axum response.
pub fn into_axum_response(response: Response) -> AxumResponse {
    let (status, content_type, body) = response.into_parts();

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = match HeaderValue::from_str(&content_type) {
        Ok(value) => value,
        Err(_) => HeaderValue::from_static("text/plain; charset=utf-8"),
    };

    let mut axum_response = AxumResponse::new(Body::from(body));
    *axum_response.status_mut() = status;
    axum_response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    axum_response
}
