use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

fn unauthorized() -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "Authentication required")
}

// Basic Auth extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Получаем заголовок Authorization
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;

        // Проверяем что это Basic auth
        let encoded = auth_header.strip_prefix("Basic ").ok_or_else(unauthorized)?;

        // Декодируем base64
        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| unauthorized())?;

        let credentials = String::from_utf8(decoded).map_err(|_| unauthorized())?;

        // Разделяем email:password
        let (email, password) = credentials.split_once(':').ok_or_else(unauthorized)?;

        let user = state
            .accounts
            .authenticate(email, password)
            .await?
            .ok_or_else(unauthorized)?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}

/// Значение заголовка Authorization для email и пароля.
pub fn basic_auth_header(email: &str, password: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{email}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips_through_base64() {
        let header = basic_auth_header("ravi@example.com", "pa:ss");
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(general_purpose::STANDARD.decode(encoded).unwrap()).unwrap();
        // пароль может содержать двоеточие, делим по первому
        assert_eq!(decoded.split_once(':'), Some(("ravi@example.com", "pa:ss")));
    }
}
