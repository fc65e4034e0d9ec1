use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::Booking;
use crate::store::BookingStore;

pub const HISTORY_UNAVAILABLE: &str = "Failed to load bookings";

/// История броней для экрана «Мои брони».
#[derive(Debug, Clone, Serialize)]
pub struct BookingHistory {
    pub bookings: Vec<Booking>,
    /// Сообщение для пользователя, если историю получить не удалось.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Clone)]
pub struct HistoryReader {
    store: Arc<dyn BookingStore>,
}

impl HistoryReader {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Брони пользователя по времени создания. Ошибка чтения не фатальна:
    /// возвращается пустой список с уведомлением.
    pub async fn list_bookings(&self, user_id: Uuid) -> BookingHistory {
        match self.store.list_for_user(user_id).await {
            Ok(bookings) => {
                debug!("Loaded {} bookings for user {}", bookings.len(), user_id);
                BookingHistory { bookings, notice: None }
            }
            Err(e) => {
                error!("Failed to load bookings for user {}: {}", user_id, e);
                BookingHistory {
                    bookings: Vec::new(),
                    notice: Some(HISTORY_UNAVAILABLE.to_string()),
                }
            }
        }
    }
}
