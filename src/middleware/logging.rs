//! Logging middleware
//!
//! Wraps every request in a tracing span keyed by a request id, echoes the id
//! in the `x-request-id` response header and logs the outcome with timing.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::handlers::error::InternalErrorDetail;
use crate::server::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id from the incoming headers, or a fresh one
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn request_tracing(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers());

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %path,
        user_id = tracing::field::Empty,
        user_email = tracing::field::Empty,
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Some(InternalErrorDetail(message)) = response.extensions().get::<InternalErrorDetail>().cloned() {
        if state.settings.is_development() {
            let status = response.status();
            response = (status, Json(json!({ "error": "Internal server error", "message": message }))).into_response();
        }
    }

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status >= 500 {
            warn!(status, elapsed_ms, "Request completed with server error");
        } else {
            info!(status, elapsed_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_echoed_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-abc"));
        assert_eq!(request_id(&headers), "req-abc");

        let generated = request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
