//! Event catalog handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::handlers::error::{ApiJson, ApiPath, ApiResult};
use crate::middleware::AuthUser;
use crate::models::event::{CreateEventRequest, Event, EventDetail, EventSummary};
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event))
        .route("/today", get(today))
        .route("/upcoming", get(upcoming))
        .route("/:id", get(event_detail))
}

async fn create_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let event = state.services.event_service.create_event(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn today(State(state): State<AppState>) -> ApiResult<Json<Vec<EventSummary>>> {
    Ok(Json(state.services.event_service.today().await?))
}

async fn upcoming(State(state): State<AppState>) -> ApiResult<Json<Vec<EventSummary>>> {
    Ok(Json(state.services.event_service.upcoming().await?))
}

async fn event_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Json<EventDetail>> {
    Ok(Json(state.services.event_service.detail(event_id, auth.user_id).await?))
}
