use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{Booking, NewBooking, Showing};
use crate::services::pricing::PriceCalculator;
use crate::services::selection::Selection;
use crate::store::{BookingStore, StoreError};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("select at least one seat before booking")]
    EmptySelection,
    #[error("invalid showing: {0}")]
    InvalidShowing(#[from] ValidationErrors),
    #[error("Idempotency-Key was already used for a different booking")]
    KeyReused,
    #[error("Failed to save booking")]
    Store(#[source] StoreError),
}

/// Оформление брони: упаковывает сеанс, места и цену в запись хранилища.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    pricing: PriceCalculator,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, pricing: PriceCalculator) -> Self {
        Self { store, pricing }
    }

    pub fn pricing(&self) -> PriceCalculator {
        self.pricing
    }

    /// Записать бронь для выбранных мест.
    ///
    /// Повторный вызов с тем же `idempotency_key` возвращает уже созданную бронь;
    /// тот же ключ с другим сеансом или местами даёт `KeyReused`.
    /// Без ключа каждый вызов создаёт новую запись. Автоматических повторов нет:
    /// при ошибке хранилища вызывающий сохраняет выбор и может повторить сам.
    pub async fn submit(
        &self,
        user_id: Uuid,
        showing: &Showing,
        selection: &Selection,
        idempotency_key: Option<Uuid>,
    ) -> Result<Booking, BookingError> {
        if selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        showing.validate()?;

        if let Some(key) = idempotency_key {
            if let Some(existing) = self.find_by_key(user_id, key).await? {
                info!("Booking {} already submitted with key {}", existing.id, key);
                return replayed(existing, showing, selection);
            }
        }

        let new_booking = NewBooking {
            user_id,
            movie_title: showing.movie_title.clone(),
            show_time: showing.show_time.clone(),
            seats: selection.seats().to_vec(),
            total_price: self.pricing.total(selection),
            created_at: Utc::now(),
            idempotency_key,
        };

        match (self.store.insert(new_booking).await, idempotency_key) {
            (Ok(booking), _) => {
                info!(
                    "Booking {} confirmed: {} / {} seats [{}] total {}",
                    booking.id,
                    booking.movie_title,
                    booking.show_time,
                    selection.display(),
                    booking.total_price
                );
                Ok(booking)
            }
            // Параллельный запрос с тем же ключом успел записать бронь первым
            (Err(StoreError::Conflict(reason)), Some(key)) => {
                warn!("Idempotent booking race for user {}: {}", user_id, reason);
                match self.find_by_key(user_id, key).await? {
                    Some(existing) => replayed(existing, showing, selection),
                    None => Err(BookingError::Store(StoreError::Conflict(reason))),
                }
            }
            (Err(e), _) => {
                error!("Failed to save booking for user {}: {}", user_id, e);
                Err(BookingError::Store(e))
            }
        }
    }

    /// Бронь, уже записанная пользователем с этим ключом.
    pub async fn find_by_key(&self, user_id: Uuid, key: Uuid) -> Result<Option<Booking>, BookingError> {
        self.store
            .find_by_idempotency_key(user_id, key)
            .await
            .map_err(|e| {
                error!("Idempotency lookup failed for user {}: {}", user_id, e);
                BookingError::Store(e)
            })
    }
}

// Повтор допустим только для того же сеанса и тех же мест в том же порядке
fn replayed(existing: Booking, showing: &Showing, selection: &Selection) -> Result<Booking, BookingError> {
    let seats: Vec<String> = selection.seats().iter().map(ToString::to_string).collect();
    if existing.movie_title != showing.movie_title
        || existing.show_time != showing.show_time
        || existing.seats != seats
    {
        warn!("Idempotency key of booking {} reused for a different request", existing.id);
        return Err(BookingError::KeyReused);
    }
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn selection(raw: &[&str]) -> Selection {
        let mut selection = Selection::new(3);
        for seat in raw {
            selection.toggle(seat.parse().unwrap()).unwrap();
        }
        selection
    }

    fn service(store: Arc<MemoryStore>) -> BookingService {
        BookingService::new(store, PriceCalculator::new(200))
    }

    #[tokio::test]
    async fn persists_seats_in_click_order_with_total() {
        let store = Arc::new(MemoryStore::default());
        let user = Uuid::new_v4();
        let showing = Showing::new("RRR", "Screen 2 - 10:00 AM");

        let booking = service(store.clone())
            .submit(user, &showing, &selection(&["B2", "A1"]), None)
            .await
            .unwrap();

        assert_eq!(booking.movie_title, "RRR");
        assert_eq!(booking.show_time, "Screen 2 - 10:00 AM");
        assert_eq!(booking.seats, vec!["B2", "A1"]);
        assert_eq!(booking.total_price, 400);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn rejects_empty_selection_and_blank_showing() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone());
        let user = Uuid::new_v4();

        let err = service
            .submit(user, &Showing::new("RRR", "10:00"), &Selection::new(3), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::EmptySelection));

        let err = service
            .submit(user, &Showing::new("", "10:00"), &selection(&["A1"]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidShowing(_)));
        assert_eq!(store.booking_count().await, 0);
    }

    #[tokio::test]
    async fn same_idempotency_key_returns_original_booking() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone());
        let user = Uuid::new_v4();
        let key = Uuid::new_v4();
        let showing = Showing::new("Salaar", "Screen 1 - 10:45 AM");

        let first = service.submit(user, &showing, &selection(&["A1"]), Some(key)).await.unwrap();
        let second = service.submit(user, &showing, &selection(&["A1"]), Some(key)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn same_key_with_different_request_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone());
        let user = Uuid::new_v4();
        let key = Uuid::new_v4();
        let showing = Showing::new("Salaar", "Screen 1 - 10:45 AM");

        service.submit(user, &showing, &selection(&["A1"]), Some(key)).await.unwrap();

        let err = service
            .submit(user, &showing, &selection(&["A1", "B2"]), Some(key))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::KeyReused));

        let other_showing = Showing::new("Barbie", "Screen 1 - 10:00 AM");
        let err = service
            .submit(user, &other_showing, &selection(&["A1"]), Some(key))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::KeyReused));
        assert_eq!(store.booking_count().await, 1);

        // ключи разных пользователей не пересекаются
        service
            .submit(Uuid::new_v4(), &other_showing, &selection(&["A1"]), Some(key))
            .await
            .unwrap();
        assert_eq!(store.booking_count().await, 2);
    }

    #[tokio::test]
    async fn without_key_duplicates_are_possible() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone());
        let user = Uuid::new_v4();
        let showing = Showing::new("Barbie", "Screen 1 - 10:00 AM");

        service.submit(user, &showing, &selection(&["A1"]), None).await.unwrap();
        service.submit(user, &showing, &selection(&["A1"]), None).await.unwrap();
        assert_eq!(store.booking_count().await, 2);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let store = Arc::new(MemoryStore::default());
        store.fail_writes(true);

        let err = service(store.clone())
            .submit(Uuid::new_v4(), &Showing::new("RRR", "10:00"), &selection(&["A1"]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Store(StoreError::Unavailable(_))));
    }
}
