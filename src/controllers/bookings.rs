use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::middleware::AuthUser;
use crate::services::BookingHistory;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", get(get_user_bookings))
}

// GET /api/bookings
// Ошибка чтения не превращается в 5xx: клиент получает пустой список и notice
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Json<BookingHistory> {
    Json(state.history.list_bookings(user.user_id).await)
}
