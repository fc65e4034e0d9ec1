use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl User {
    // Проверить пароль по bcrypt-хэшу
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_bcrypt_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            password_hash: bcrypt::hash("secret1", 4).unwrap(),
            created_at: Utc::now(),
        };
        assert!(user.verify_password("secret1"));
        assert!(!user.verify_password("secret2"));
    }
}
