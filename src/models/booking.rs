use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::seat::SeatId;

/// Подтверждённая бронь. После записи в хранилище не меняется.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_title: String,
    pub show_time: String,
    /// Места в порядке выбора пользователем.
    pub seats: Vec<String>,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<Uuid>,
}

/// Данные для записи новой брони; идентификатор назначает хранилище.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub movie_title: String,
    pub show_time: String,
    pub seats: Vec<SeatId>,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub idempotency_key: Option<Uuid>,
}

impl NewBooking {
    pub fn into_booking(self, id: Uuid) -> Booking {
        let seats = self.seat_labels();
        Booking {
            id,
            user_id: self.user_id,
            movie_title: self.movie_title,
            show_time: self.show_time,
            seats,
            total_price: self.total_price,
            created_at: self.created_at,
            idempotency_key: self.idempotency_key,
        }
    }

    pub fn seat_labels(&self) -> Vec<String> {
        self.seats.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_booking_keeps_click_order_and_fields() {
        let key = Uuid::new_v4();
        let new_booking = NewBooking {
            user_id: Uuid::new_v4(),
            movie_title: "RRR".to_string(),
            show_time: "Screen 2 - 10:00 AM".to_string(),
            seats: vec!["B2".parse().unwrap(), "A1".parse().unwrap()],
            total_price: 400,
            created_at: Utc::now(),
            idempotency_key: Some(key),
        };
        let id = Uuid::new_v4();

        let booking = new_booking.clone().into_booking(id);
        assert_eq!(booking.id, id);
        assert_eq!(booking.user_id, new_booking.user_id);
        assert_eq!(booking.movie_title, "RRR");
        assert_eq!(booking.seats, vec!["B2", "A1"]);
        assert_eq!(booking.total_price, 400);
        assert_eq!(booking.idempotency_key, Some(key));
    }
}
