//! Pregame handlers
//!
//! Thin wrappers over [`MembershipService`](crate::services::MembershipService):
//! payloads are validated here, business rules are enforced in the service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::handlers::error::{ApiJson, ApiPath, ApiResult};
use crate::middleware::AuthUser;
use crate::models::join_request::{JoinInfoRequest, JoinRequest, MessageResponse, ReviewDecision, ReviewRequest};
use crate::models::pregame::{CreatePregameRequest, HostView, Pregame, PregameSummary};
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_pregame))
        .route("/event/:event_id", get(event_pregames))
        .route("/:id/join", post(join))
        .route("/:id/request", post(request_to_join))
        .route("/:id/host", get(host_view))
        .route("/:id/approve", post(approve))
        .route("/:id/decline", post(decline))
}

async fn create_pregame(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreatePregameRequest>,
) -> ApiResult<(StatusCode, Json<Pregame>)> {
    let pregame = request.validate()?;
    let pregame = state.services.membership_service.create_pregame(auth.user_id, pregame).await?;
    Ok((StatusCode::CREATED, Json(pregame)))
}

async fn event_pregames(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<PregameSummary>>> {
    let pregames = state
        .services
        .membership_service
        .list_event_pregames(event_id, Some(auth.user_id))
        .await?;
    Ok(Json(pregames))
}

async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<JoinInfoRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let info = request.validate()?;
    let response = state
        .services
        .membership_service
        .join_open_pregame(pregame_id, auth.user_id, info)
        .await?;
    Ok(Json(response))
}

async fn request_to_join(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<JoinInfoRequest>,
) -> ApiResult<(StatusCode, Json<JoinRequest>)> {
    let info = request.validate()?;
    let request = state
        .services
        .membership_service
        .request_to_join_pregame(pregame_id, auth.user_id, info)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn host_view(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
) -> ApiResult<Json<HostView>> {
    Ok(Json(state.services.membership_service.get_host_view(pregame_id, auth.user_id).await?))
}

async fn review(
    state: AppState,
    auth: AuthUser,
    pregame_id: Uuid,
    request: ReviewRequest,
    decision: ReviewDecision,
) -> ApiResult<Json<MessageResponse>> {
    let request_id = request.validate()?;
    let response = state
        .services
        .membership_service
        .review_join_request(Some(pregame_id), request_id, auth.user_id, decision)
        .await?;
    Ok(Json(response))
}

async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> ApiResult<Json<MessageResponse>> {
    review(state, auth, pregame_id, request, ReviewDecision::Approve).await
}

async fn decline(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(pregame_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> ApiResult<Json<MessageResponse>> {
    review(state, auth, pregame_id, request, ReviewDecision::Decline).await
}
