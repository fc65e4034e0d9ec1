//! Сессия выбора мест: экран выбора мест одного пользователя для одного сеанса.
//!
//! Сессия создаётся пустой, меняется кликами по местам и удаляется либо при
//! уходе с экрана, либо после успешной брони. Неудачная бронь сессию не трогает,
//! чтобы пользователь мог повторить оплату.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::SeatingConfig;
use crate::models::{Booking, SeatError, SeatGrid, SeatId, Showing};
use crate::services::booking::{BookingError, BookingService};
use crate::services::pricing::PriceCalculator;
use crate::services::selection::{Selection, SelectionError, Toggle};
use crate::store::{SessionStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("seat session {0} not found")]
    NotFound(Uuid),
    #[error("seat session belongs to another user")]
    Forbidden,
    #[error(transparent)]
    Seat(#[from] SeatError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("seat session storage failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub showing: Showing,
    pub grid: SeatGrid,
    pub selection: Selection,
    pub created_at: DateTime<Utc>,
}

impl SeatSession {
    pub fn open(user_id: Uuid, showing: Showing, seating: &SeatingConfig) -> Result<Self, SessionError> {
        showing.validate().map_err(BookingError::from)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            showing,
            grid: SeatGrid::new(seating.rows, seating.columns)?,
            selection: Selection::new(seating.max_seats),
            created_at: Utc::now(),
        })
    }

    /// Переключить место. Место вне зала отклоняется так же, как и переполнение:
    /// выбор остаётся прежним.
    pub fn toggle(&mut self, seat: SeatId) -> Result<Toggle, SelectionError> {
        if !self.grid.contains(&seat) {
            return Err(SelectionError::UnknownSeat(seat));
        }
        self.selection.toggle(seat)
    }

    pub fn view(&self, pricing: PriceCalculator) -> SessionView {
        SessionView {
            id: self.id,
            movie_title: self.showing.movie_title.clone(),
            show_time: self.showing.show_time.clone(),
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            seats: self
                .grid
                .seats()
                .into_iter()
                .map(|seat| SeatView {
                    seat: seat.to_string(),
                    selected: self.selection.contains(&seat),
                })
                .collect(),
            selected: self.selection.seats().iter().map(ToString::to_string).collect(),
            max_seats: self.selection.max_seats(),
            price_per_seat: pricing.price_per_seat(),
            total_price: pricing.total(&self.selection),
        }
    }

    fn ensure_owner(&self, user_id: Uuid) -> Result<(), SessionError> {
        if self.user_id != user_id {
            return Err(SessionError::Forbidden);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub seat: String,
    pub selected: bool,
}

/// Состояние экрана выбора мест для клиента.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub movie_title: String,
    pub show_time: String,
    pub rows: u8,
    pub columns: u8,
    /// Все места зала по рядам.
    pub seats: Vec<SeatView>,
    /// Выбранные места в порядке кликов.
    pub selected: Vec<String>,
    pub max_seats: usize,
    pub price_per_seat: i64,
    pub total_price: i64,
}

#[derive(Clone)]
pub struct SeatSessionService {
    sessions: Arc<dyn SessionStore>,
    bookings: BookingService,
    seating: SeatingConfig,
}

impl SeatSessionService {
    pub fn new(sessions: Arc<dyn SessionStore>, bookings: BookingService, seating: SeatingConfig) -> Self {
        Self {
            sessions,
            bookings,
            seating,
        }
    }

    pub fn pricing(&self) -> PriceCalculator {
        self.bookings.pricing()
    }

    pub async fn open(&self, user_id: Uuid, showing: Showing) -> Result<SeatSession, SessionError> {
        let session = SeatSession::open(user_id, showing, &self.seating)?;
        self.sessions.save(&session).await?;
        info!(
            "Seat session {} opened by {} for {} / {}",
            session.id, user_id, session.showing.movie_title, session.showing.show_time
        );
        Ok(session)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<SeatSession, SessionError> {
        let session = self.sessions.load(id).await?.ok_or(SessionError::NotFound(id))?;
        session.ensure_owner(user_id)?;
        Ok(session)
    }

    /// Клик по месту. Отклонённый клик ничего не сохраняет.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        id: Uuid,
        seat: &str,
    ) -> Result<(SeatSession, Toggle), SessionError> {
        let seat: SeatId = seat.trim().parse()?;
        let mut session = self.get(user_id, id).await?;

        let toggle = match session.toggle(seat) {
            Ok(toggle) => toggle,
            Err(e) => {
                debug!("Seat session {}: toggle {} rejected: {}", id, seat, e);
                return Err(e.into());
            }
        };

        self.sessions.save(&session).await?;
        debug!("Seat session {}: {:?}, now [{}]", id, toggle, session.selection.display());
        Ok((session, toggle))
    }

    /// Уход с экрана: выбор отбрасывается, брони не создаются.
    pub async fn discard(&self, user_id: Uuid, id: Uuid) -> Result<(), SessionError> {
        self.get(user_id, id).await?;
        self.sessions.delete(id).await?;
        info!("Seat session {} discarded", id);
        Ok(())
    }

    /// Оформить бронь из сессии. Успех закрывает сессию, ошибка оставляет её как есть.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        id: Uuid,
        idempotency_key: Option<Uuid>,
    ) -> Result<Booking, SessionError> {
        let session = match (self.get(user_id, id).await, idempotency_key) {
            (Ok(session), _) => session,
            // Сессию закрыла успешная бронь; повтор с тем же ключом получает её же
            (Err(SessionError::NotFound(_)), Some(key)) => {
                return match self.bookings.find_by_key(user_id, key).await? {
                    Some(booking) => {
                        info!("Replayed booking {} for closed seat session {}", booking.id, id);
                        Ok(booking)
                    }
                    None => Err(SessionError::NotFound(id)),
                };
            }
            (Err(e), _) => return Err(e),
        };
        let booking = self
            .bookings
            .submit(user_id, &session.showing, &session.selection, idempotency_key)
            .await?;

        // Бронь уже записана; сессия просто истечёт по TTL, если удалить не вышло
        if let Err(e) = self.sessions.delete(id).await {
            warn!("Failed to close seat session {} after booking {}: {}", id, booking.id, e);
        }
        Ok(booking)
    }
}
