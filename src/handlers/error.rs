//! HTTP error mapping
//!
//! Converts [`MadSocialError`] into JSON responses. Internal failures never
//! carry their message in the body; the message travels in a response
//! extension so the request middleware can expose it in development.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

use crate::utils::errors::{ErrorSeverity, FieldError, MadSocialError};

/// Message of an internal failure, attached to 5xx responses
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub MadSocialError);

impl From<MadSocialError> for ApiError {
    fn from(error: MadSocialError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(MadSocialError::Validation(vec![FieldError::new(
            "body",
            rejection.body_text(),
        )]))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(MadSocialError::Validation(vec![FieldError::new(
            "id",
            rejection.body_text(),
        )]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match error.severity() {
            ErrorSeverity::Info => {
                info!(status = status.as_u16(), error = %error, retryable = error.is_recoverable(), "Request rejected")
            },
            ErrorSeverity::Warning => warn!(status = status.as_u16(), error = %error, "Request rejected"),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(status = status.as_u16(), error = %error, severity = %error.severity(), "Request failed")
            }
        }

        if !error.is_client_error() {
            let mut response = (
                status,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response();
            response
                .extensions_mut()
                .insert(InternalErrorDetail(error.to_string()));
            return response;
        }

        let body = match error {
            MadSocialError::Validation(details) => json!({
                "error": "Validation error",
                "details": details,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections use the API error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error shape
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

pub type ApiResult<T> = std::result::Result<T, ApiError>;
