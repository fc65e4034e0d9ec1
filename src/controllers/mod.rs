pub mod accounts;
pub mod bookings;
pub mod movies;
pub mod seats;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(accounts::routes())
        .merge(seats::routes())
        .merge(bookings::routes())
}
