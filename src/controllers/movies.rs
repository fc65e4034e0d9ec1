use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::models::{Movie, NOW_SHOWING};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/movies", get(list_movies))
}

// GET /api/movies
async fn list_movies() -> Json<&'static [Movie]> {
    Json(NOW_SHOWING)
}
