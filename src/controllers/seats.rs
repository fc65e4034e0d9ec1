use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{Booking, Showing};
use crate::services::{PaymentForm, SessionView, Toggle};
use crate::AppState;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seat-sessions", post(open_session))
        .route("/seat-sessions/{id}", get(get_session).delete(discard_session))
        .route("/seat-sessions/{id}/toggle", patch(toggle_seat))
        .route("/seat-sessions/{id}/checkout", post(checkout))
}

// POST /api/seat-sessions
async fn open_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(showing): Json<Showing>,
) -> ApiResult<impl IntoResponse> {
    let session = state.sessions.open(user.user_id, showing).await?;
    Ok((StatusCode::CREATED, Json(session.view(state.sessions.pricing()))))
}

// GET /api/seat-sessions/{id}
async fn get_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let session = state.sessions.get(user.user_id, id).await?;
    Ok(Json(session.view(state.sessions.pricing())))
}

// DELETE /api/seat-sessions/{id}
async fn discard_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.sessions.discard(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/seat-sessions/{id}/toggle
#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat: String,
}

#[derive(Debug, Serialize)]
struct ToggleSeatResponse {
    toggled: Toggle,
    session: SessionView,
}

async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> ApiResult<Json<ToggleSeatResponse>> {
    let (session, toggled) = state.sessions.toggle(user.user_id, id, &req.seat).await?;
    Ok(Json(ToggleSeatResponse {
        toggled,
        session: session.view(state.sessions.pricing()),
    }))
}

// POST /api/seat-sessions/{id}/checkout
#[derive(Debug, Serialize)]
struct CheckoutResponse {
    message: &'static str,
    booking: Booking,
}

async fn checkout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(form): Json<PaymentForm>,
) -> ApiResult<impl IntoResponse> {
    let idempotency_key = idempotency_key(&headers)?;

    // Форма с ошибками не отправляется; сессия остаётся как была
    if let Err(errors) = form.validate() {
        return Err(ApiError::validation("Please fix form errors", &errors));
    }

    let booking = state.sessions.checkout(user.user_id, id, idempotency_key).await?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            message: "Booking Confirmed!",
            booking,
        }),
    ))
}

fn idempotency_key(headers: &HeaderMap) -> ApiResult<Option<Uuid>> {
    let Some(value) = headers.get(IDEMPOTENCY_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(Some)
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Idempotency-Key must be a UUID"))
}
