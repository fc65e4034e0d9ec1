use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{NewUser, Profile, User};
use crate::store::{ProfileStore, StoreError, UserStore};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid signup form")]
    Invalid(#[from] ValidationErrors),
    #[error("email is already registered")]
    EmailTaken,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => AccountError::EmailTaken,
            other => AccountError::Store(other),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Регистрация, вход и профиль пользователя.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, profiles: Arc<dyn ProfileStore>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            profiles,
            bcrypt_cost,
        }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<User, AccountError> {
        req.validate()?;

        let password = req.password;
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AccountError::Hash(e.to_string()))?
            .map_err(|e| AccountError::Hash(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                email: req.email,
                name: req.name.trim().to_string(),
                password_hash,
            })
            .await?;

        // Стартовый профиль из данных регистрации
        let profile = Profile {
            name: user.name.clone(),
            email: user.email.clone(),
            address: String::new(),
        };
        if let Err(e) = self.profiles.put(user.id, &profile).await {
            error!("Failed to create profile for {}: {}", user.id, e);
        }

        info!("User {} signed up", user.id);
        Ok(user)
    }

    /// `None`, если пользователя нет или пароль не подходит.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };

        let candidate = password.to_string();
        let hash_owner = user.clone();
        let verified = tokio::task::spawn_blocking(move || hash_owner.verify_password(&candidate))
            .await
            .unwrap_or(false);

        Ok(verified.then_some(user))
    }

    /// Отсутствующий профиль отдаётся пустым.
    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        Ok(self.profiles.get(user_id).await?.unwrap_or_default())
    }

    pub async fn save_profile(&self, user_id: Uuid, profile: &Profile) -> Result<(), StoreError> {
        self.profiles.put(user_id, profile).await?;
        info!("Profile saved for user {}", user_id);
        Ok(())
    }
}
