use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::booking::BookingError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { .. } => ApiError::NotFound(value.to_string()),
            StoreError::Unauthorized => {
                error!("entity store rejected service credentials");
                ApiError::Internal("Entity store unavailable".into())
            }
            StoreError::Url(err) => {
                error!("Store URL error: {err}");
                ApiError::Internal("Entity store misconfigured".into())
            }
            StoreError::Http(_) | StoreError::Status(_) => {
                error!("Store error: {value}");
                ApiError::BadGateway("Entity store unavailable".into())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<BookingError> for ApiError {
    fn from(value: BookingError) -> Self {
        match value {
            BookingError::Validation(err) => ApiError::BadRequest(err.to_string()),
            BookingError::Authentication(err) => ApiError::Unauthorized(err.to_string()),
            BookingError::Submission(_) => ApiError::BadGateway(value.to_string()),
        }
    }
}
