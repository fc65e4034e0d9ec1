//! Хранилища приложения.
//!
//! Каждое хранилище описано трейтом с двумя реализациями:
//! - PostgreSQL / Redis для боевого режима
//! - in-memory для локального запуска и тестов

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, NewBooking, NewUser, Profile, User};
use crate::services::seat_session::SeatSession;

pub mod memory;
pub mod postgres;
pub mod redis_sessions;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;
pub use self::redis_sessions::RedisSessionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Коллекция броней.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Записать новую бронь. Идентификатор назначает хранилище.
    ///
    /// Повтор `idempotency_key` того же пользователя даёт `StoreError::Conflict`.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    /// Брони пользователя по возрастанию `created_at`.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError>;

    async fn find_by_idempotency_key(
        &self,
        user_id: Uuid,
        key: Uuid,
    ) -> Result<Option<Booking>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Занятый email даёт `StoreError::Conflict`.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Перезаписывает профиль целиком.
    async fn put(&self, user_id: Uuid, profile: &Profile) -> Result<(), StoreError>;
}

/// Краткоживущие сессии выбора мест.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn save(&self, session: &SeatSession) -> Result<(), StoreError>;

    /// Истёкшая сессия считается отсутствующей.
    async fn load(&self, id: Uuid) -> Result<Option<SeatSession>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Email сравнивается без учёта регистра и пробелов по краям.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
