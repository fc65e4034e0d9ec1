use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::models::Profile;
use crate::services::SignupRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(signup))
        .route("/profile", get(get_profile).put(save_profile))
}

#[derive(Debug, Serialize)]
struct SignupResponse {
    id: Uuid,
    email: String,
    name: String,
}

// POST /api/users
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.accounts.signup(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user.id,
            email: user.email,
            name: user.name,
        }),
    ))
}

// GET /api/profile
async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Profile>> {
    Ok(Json(state.accounts.profile(user.user_id).await?))
}

// PUT /api/profile - перезаписывает профиль целиком
async fn save_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(profile): Json<Profile>,
) -> ApiResult<Json<Profile>> {
    state.accounts.save_profile(user.user_id, &profile).await?;
    Ok(Json(profile))
}
