use std::env;
use std::str::FromStr;
use thiserror::Error;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub seating: SeatingConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

// Где хранятся брони, пользователи и сессии выбора мест
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

// Настройки базы данных
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Настройки Redis
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub session_ttl_seconds: u64,
}

// Настройки паролей
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Стоимость bcrypt, 4..=31.
    pub bcrypt_cost: u32,
}

/// Параметры зала и продажи билетов.
///
/// Значения по умолчанию: 3 места на бронь, 200 за место, зал 5x6.
#[derive(Debug, Clone)]
pub struct SeatingConfig {
    pub max_seats: usize,
    pub price_per_seat: i64,
    pub rows: u8,
    pub columns: u8,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            max_seats: 3,
            price_per_seat: 200,
            rows: 5,
            columns: 6,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match var_or("STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        // Для in-memory режима адреса БД и Redis не нужны
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(v) => Ok(v),
                Err(_) if backend == StorageBackend::Memory => Ok(String::new()),
                Err(_) => Err(ConfigError::Missing(name)),
            }
        };

        let log_format = match var_or("LOG_FORMAT", "text").as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        let config = Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var("PORT", 8000)?,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "showtime=debug,tower_http=debug"),
                log_format,
            },
            storage: StorageConfig { backend },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                pool_size: parse_var("DB_POOL_SIZE", 20)?,
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                session_ttl_seconds: parse_var("SEAT_SESSION_TTL_SECONDS", 900)?,
            },
            auth: AuthConfig {
                bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            seating: SeatingConfig {
                max_seats: parse_var("MAX_SEATS", 3)?,
                price_per_seat: parse_var("PRICE_PER_SEAT", 200)?,
                rows: parse_var("SEAT_ROWS", 5)?,
                columns: parse_var("SEAT_COLUMNS", 6)?,
            },
        };

        config.auth.validate()?;
        config.seating.validate()?;
        Ok(config)
    }

    /// Конфигурация для тестов и локального запуска без внешних сервисов.
    pub fn in_memory() -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                rust_log: "showtime=debug".to_string(),
                log_format: LogFormat::Text,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            database: DatabaseConfig {
                url: String::new(),
                pool_size: 1,
            },
            redis: RedisConfig {
                url: String::new(),
                session_ttl_seconds: 900,
            },
            // минимальная стоимость: хеширование не тормозит тесты
            auth: AuthConfig { bcrypt_cost: 4 },
            seating: SeatingConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(invalid("BCRYPT_COST", self.bcrypt_cost));
        }
        Ok(())
    }
}

impl SeatingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_seats == 0 {
            return Err(invalid("MAX_SEATS", self.max_seats));
        }
        if self.price_per_seat <= 0 {
            return Err(invalid("PRICE_PER_SEAT", self.price_per_seat));
        }
        // Ряды обозначаются буквами A..Z
        if self.rows == 0 || self.rows > 26 {
            return Err(invalid("SEAT_ROWS", self.rows));
        }
        if self.columns == 0 {
            return Err(invalid("SEAT_COLUMNS", self.columns));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seating_matches_documented_values() {
        let seating = SeatingConfig::default();
        assert_eq!(seating.max_seats, 3);
        assert_eq!(seating.price_per_seat, 200);
        assert_eq!((seating.rows, seating.columns), (5, 6));
        assert!(seating.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_and_oversized_grids() {
        let mut seating = SeatingConfig::default();
        seating.rows = 0;
        assert!(matches!(
            seating.validate(),
            Err(ConfigError::Invalid { name: "SEAT_ROWS", .. })
        ));

        seating.rows = 27;
        assert!(seating.validate().is_err());

        let seating = SeatingConfig {
            max_seats: 0,
            ..SeatingConfig::default()
        };
        assert!(seating.validate().is_err());
    }

    #[test]
    fn bcrypt_cost_must_be_in_range() {
        assert!(AuthConfig { bcrypt_cost: 4 }.validate().is_ok());
        assert!(AuthConfig { bcrypt_cost: bcrypt::DEFAULT_COST }.validate().is_ok());
        assert!(matches!(
            AuthConfig { bcrypt_cost: 3 }.validate(),
            Err(ConfigError::Invalid { name: "BCRYPT_COST", .. })
        ));
        assert!(AuthConfig { bcrypt_cost: 32 }.validate().is_err());
        assert_eq!(Config::in_memory().auth.bcrypt_cost, 4);
    }
}
