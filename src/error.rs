use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::services::{AccountError, BookingError, SelectionError, SessionError};
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// Ошибка HTTP-слоя: статус плюс JSON `{success: false, message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                success: false,
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    pub fn validation(message: &str, errors: &ValidationErrors) -> Self {
        let mut err = Self::new(StatusCode::UNPROCESSABLE_ENTITY, message);
        err.body.errors = validation_messages(errors);
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Сообщения по полям, отсортированные для стабильного вывода.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!("store error: {}", e);
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Storage is temporarily unavailable")
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::EmptySelection => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            BookingError::InvalidShowing(ref errors) => ApiError::validation("Invalid showing", errors),
            BookingError::KeyReused => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            // подробности уже в логе сервиса броней
            BookingError::Store(_) => ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, e.to_string()),
            SessionError::Forbidden => ApiError::new(StatusCode::FORBIDDEN, e.to_string()),
            SessionError::Seat(_) => ApiError::new(StatusCode::BAD_REQUEST, e.to_string()),
            SessionError::Selection(SelectionError::CapacityReached { .. }) => {
                ApiError::new(StatusCode::CONFLICT, e.to_string())
            }
            SessionError::Selection(SelectionError::UnknownSeat(_)) => {
                ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            SessionError::Booking(inner) => inner.into(),
            SessionError::Store(inner) => inner.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Invalid(ref errors) => ApiError::validation("Invalid signup form", errors),
            AccountError::EmailTaken => ApiError::new(StatusCode::CONFLICT, e.to_string()),
            AccountError::Hash(_) => {
                tracing::error!("{}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Signup failed")
            }
            AccountError::Store(inner) => inner.into(),
        }
    }
}
