use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Профиль пользователя: один документ на пользователя, перезаписывается целиком.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}
