//! Authentication middleware
//!
//! Resolves the acting user from the `Authorization: Bearer <token>` header.
//! Handlers that take an [`AuthUser`] argument are protected routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{debug, Span};
use uuid::Uuid;

use crate::handlers::error::ApiError;
use crate::server::AppState;
use crate::services::auth::AuthContext;
use crate::utils::errors::MadSocialError;

/// The authenticated caller of a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl AuthUser {
    /// Attach the caller to the request span opened by the logging middleware
    pub fn record_in(&self, span: &Span) {
        span.record("user_id", tracing::field::display(self.user_id));
        span.record("user_email", self.email.as_str());
    }
}

impl From<AuthContext> for AuthUser {
    fn from(context: AuthContext) -> Self {
        Self {
            user_id: context.user_id,
            email: context.email,
        }
    }
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| MadSocialError::Authentication("Authentication required".to_string()))?;

        let user = AuthUser::from(state.services.auth_service.verify_token(token)?);
        user.record_in(&Span::current());
        debug!(user_id = %user.user_id, email = %user.email, "Authenticated request");

        Ok(user)
    }
}
