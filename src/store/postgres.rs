use async_trait::async_trait;
use uuid::Uuid;

use super::{normalize_email, BookingStore, ProfileStore, StoreError, UserStore};
use crate::database::Database;
use crate::models::{Booking, NewBooking, NewUser, Profile, User};

const BOOKING_COLUMNS: &str =
    "id, user_id, movie_title, show_time, seats, total_price, created_at, idempotency_key";

/// Брони, пользователи и профили в PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

// Нарушение уникального индекса превращаем в Conflict, остальное как есть
fn map_unique(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict(what()),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let seats = booking.seat_labels();
        let query = format!(
            "INSERT INTO bookings (user_id, movie_title, show_time, seats, total_price, created_at, idempotency_key)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {BOOKING_COLUMNS}"
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking.user_id)
            .bind(&booking.movie_title)
            .bind(&booking.show_time)
            .bind(&seats)
            .bind(booking.total_price)
            .bind(booking.created_at)
            .bind(booking.idempotency_key)
            .fetch_one(&self.db.pool)
            .await
            .map_err(|e| {
                map_unique(e, || {
                    format!("idempotency key already used by user {}", booking.user_id)
                })
            })
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at ASC, id"
        );
        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(bookings)
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: Uuid,
        key: Uuid,
    ) -> Result<Option<Booking>, StoreError> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 AND idempotency_key = $2"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(key)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(booking)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&user.email);
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, email, name, password_hash, created_at",
        )
        .bind(&email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.db.pool)
        .await
        .map_err(|e| map_unique(e, || format!("email {email} already registered")))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT name, email, address FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(profile)
    }

    async fn put(&self, user_id: Uuid, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, name, email, address)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE
             SET name = EXCLUDED.name, email = EXCLUDED.email, address = EXCLUDED.address",
        )
        .bind(user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.address)
        .execute(&self.db.pool)
        .await?;
        Ok(())
    }
}
