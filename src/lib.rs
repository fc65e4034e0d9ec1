pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod store;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use config::{Config, StorageBackend};
use services::{AccountService, BookingService, HistoryReader, PriceCalculator, SeatSessionService};
use store::{BookingStore, MemoryStore, PgStore, ProfileStore, RedisSessionStore, SessionStore, StoreError, UserStore};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub accounts: AccountService,
    pub sessions: SeatSessionService,
    pub history: HistoryReader,
    pub health: Health,
}

/// Что проверять в /health.
#[derive(Clone)]
pub enum Health {
    Memory,
    Remote {
        db: database::Database,
        redis: redis_client::RedisClient,
    },
}

/// Набор хранилищ, из которых собирается состояние.
pub struct Stores {
    pub bookings: Arc<dyn BookingStore>,
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            bookings: store.clone(),
            users: store.clone(),
            profiles: store.clone(),
            sessions: store,
        }
    }
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                let ttl = Duration::from_secs(config.redis.session_ttl_seconds);
                let store = Arc::new(MemoryStore::new(ttl));
                Ok(Self::from_stores(config, Stores::memory(store), Health::Memory))
            }
            StorageBackend::Postgres => {
                let db = database::Database::connect(&config.database).await?;
                let redis = redis_client::RedisClient::new(&config.redis.url).await?;

                let pg = Arc::new(PgStore::new(db.clone()));
                let stores = Stores {
                    bookings: pg.clone(),
                    users: pg.clone(),
                    profiles: pg,
                    sessions: Arc::new(RedisSessionStore::new(
                        redis.clone(),
                        config.redis.session_ttl_seconds,
                    )),
                };
                Ok(Self::from_stores(config, stores, Health::Remote { db, redis }))
            }
        }
    }

    pub fn from_stores(config: Config, stores: Stores, health: Health) -> Arc<Self> {
        let pricing = PriceCalculator::from_config(&config.seating);
        let bookings = BookingService::new(stores.bookings.clone(), pricing);
        let sessions = SeatSessionService::new(stores.sessions, bookings, config.seating.clone());

        Arc::new(Self {
            accounts: AccountService::new(stores.users, stores.profiles, config.auth.bcrypt_cost),
            history: HistoryReader::new(stores.bookings),
            sessions,
            health,
            config,
        })
    }

    /// Состояние поверх одного in-memory хранилища; тесты держат ссылку на него.
    pub fn in_memory(config: Config, store: Arc<MemoryStore>) -> Arc<Self> {
        Self::from_stores(config, Stores::memory(store), Health::Memory)
    }
}

/// Корневой роутер: служебные маршруты и API под /api.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "ShowTime API v1.0" }))
        .route("/health", get(health))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match &state.health {
        Health::Memory => (StatusCode::OK, "OK"),
        Health::Remote { db, redis } => {
            if let Err(e) = db.ping().await {
                warn!("Health check: database unavailable: {}", e);
                return (StatusCode::SERVICE_UNAVAILABLE, "DATABASE UNAVAILABLE");
            }
            if let Err(e) = redis.ping().await {
                warn!("Health check: redis unavailable: {}", e);
                return (StatusCode::SERVICE_UNAVAILABLE, "REDIS UNAVAILABLE");
            }
            (StatusCode::OK, "OK")
        }
    }
}
