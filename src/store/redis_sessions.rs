use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::redis_client::RedisClient;
use crate::services::seat_session::SeatSession;

/// Сессии выбора мест в Redis: JSON под ключом `seat_session:{id}` с TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }
}

fn session_key(id: Uuid) -> String {
    format!("seat_session:{}", id)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &SeatSession) -> Result<(), StoreError> {
        let data = serde_json::to_string(session)?;
        let mut conn = self.redis.conn.clone();
        // каждое сохранение продлевает жизнь сессии
        let _: () = conn.set_ex(session_key(session.id), data, self.ttl_seconds).await?;
        debug!("Saved seat session {} ({} seats)", session.id, session.selection.len());
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<SeatSession>, StoreError> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(session_key(id)).await?;
        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.redis.conn.clone();
        let _: () = conn.del(session_key(id)).await?;
        Ok(())
    }
}
