use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use super::{
    normalize_email, BookingStore, ProfileStore, SessionStore, StoreError, UserStore,
};
use crate::models::{Booking, NewBooking, NewUser, Profile, User};
use crate::services::seat_session::SeatSession;

#[derive(Default)]
struct Inner {
    bookings: Vec<Booking>,
    users: HashMap<String, User>,
    profiles: HashMap<Uuid, Profile>,
    sessions: HashMap<Uuid, (SeatSession, Instant)>,
}

/// Все хранилища в памяти процесса.
///
/// `fail_writes` имитирует недоступность хранилища на запись,
/// `fail_booking_reads` ломает только чтение броней.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    session_ttl: Duration,
    fail_writes: AtomicBool,
    fail_booking_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            session_ttl,
            fail_writes: AtomicBool::new(false),
            fail_booking_reads: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_booking_reads(&self, fail: bool) {
        self.fail_booking_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn booking_count(&self) -> usize {
        self.inner.read().await.bookings.len()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write failure".to_string()));
        }
        Ok(())
    }

    fn check_booking_read(&self) -> Result<(), StoreError> {
        if self.fail_booking_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated read failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(900))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        self.check_write()?;
        let mut inner = self.inner.write().await;

        if let Some(key) = booking.idempotency_key {
            let taken = inner
                .bookings
                .iter()
                .any(|b| b.user_id == booking.user_id && b.idempotency_key == Some(key));
            if taken {
                return Err(StoreError::Conflict(format!("idempotency key {key} already used")));
            }
        }

        let booking = booking.into_booking(Uuid::new_v4());
        inner.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        self.check_booking_read()?;
        let inner = self.inner.read().await;
        let mut bookings: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        // стабильная сортировка: при равном времени сохраняется порядок вставки
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: Uuid,
        key: Uuid,
    ) -> Result<Option<Booking>, StoreError> {
        self.check_booking_read()?;
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .iter()
            .find(|b| b.user_id == user_id && b.idempotency_key == Some(key))
            .cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        self.check_write()?;
        let email = normalize_email(&user.email);
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&email) {
            return Err(StoreError::Conflict(format!("email {email} already registered")));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: user.name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(email, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&normalize_email(email)).cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(&user_id).cloned())
    }

    async fn put(&self, user_id: Uuid, profile: &Profile) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.write().await.profiles.insert(user_id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save(&self, session: &SeatSession) -> Result<(), StoreError> {
        self.check_write()?;
        let expires_at = Instant::now() + self.session_ttl;
        self.inner
            .write()
            .await
            .sessions
            .insert(session.id, (session.clone(), expires_at));
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<SeatSession>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.sessions.get(&id) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                inner.sessions.remove(&id);
                Ok(None)
            }
            Some((session, _)) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.write().await.sessions.remove(&id);
        Ok(())
    }
}
