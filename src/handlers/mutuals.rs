//! Mutual overlap handlers

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::handlers::error::{ApiPath, ApiResult};
use crate::middleware::AuthUser;
use crate::models::mutual::MutualOverlap;
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/event/:event_id", get(event_mutuals))
        .route("/pregame/:pregame_id", get(pregame_mutuals))
}

async fn event_mutuals(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<MutualOverlap>>> {
    Ok(Json(state.services.mutual_service.mutuals_in_event(event_id, auth.user_id).await?))
}

async fn pregame_mutuals(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<MutualOverlap>>> {
    Ok(Json(state.services.mutual_service.mutuals_in_pregame(pregame_id, auth.user_id).await?))
}
