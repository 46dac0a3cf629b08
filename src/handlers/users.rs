//! User account handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::handlers::error::{ApiJson, ApiPath, ApiResult};
use crate::middleware::AuthUser;
use crate::models::pregame::MyPregames;
use crate::models::user::{AuthResponse, LoginRequest, SignupRequest, UpdateProfileRequest, User};
use crate::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", patch(update_me))
        .route("/me/pregames", get(my_pregames))
        .route("/:id", get(get_user))
}

async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.services.user_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(state.services.user_service.login(request).await?))
}

async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.user_service.get_user(user_id).await?))
}

async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.user_service.update_profile(auth.user_id, request).await?))
}

async fn my_pregames(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MyPregames>> {
    Ok(Json(state.services.membership_service.my_pregames(auth.user_id).await?))
}
