//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::Envelope;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("invalid schema name: {0}")]
    InvalidSchema(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("internal: {0}")]
    Internal(String),
}

// SQLSTATE codes surfaced as client errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";
const INVALID_INPUT: &[&str] = &["22P02", "22007", "22008", "22003", "22001"];

impl AppError {
    pub fn not_found(label: &str, key: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} '{}'", label, key))
    }

    /// HTTP status and client-facing message.
    fn classify(&self) -> (StatusCode, String) {
        match self {
            AppError::Config(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(_) | AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            AppError::UnsupportedMediaType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".into()),
            AppError::Db(e) => classify_db(e),
        }
    }
}

fn classify_db(e: &sqlx::Error) -> (StatusCode, String) {
    match e {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "record not found".into()),
        sqlx::Error::Database(db) => {
            let code = db.code();
            let detail = db.constraint().map(|c| format!(" ({})", c)).unwrap_or_default();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => (StatusCode::CONFLICT, format!("conflict: duplicate value{}", detail)),
                Some(FOREIGN_KEY_VIOLATION) => (
                    StatusCode::BAD_REQUEST,
                    format!("bad request: referenced record does not exist{}", detail),
                ),
                Some(CHECK_VIOLATION) | Some(NOT_NULL_VIOLATION) => {
                    (StatusCode::BAD_REQUEST, format!("bad request: {}", db.message()))
                }
                Some(c) if INVALID_INPUT.contains(&c) => {
                    (StatusCode::BAD_REQUEST, format!("bad request: {}", db.message()))
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "database error".into()),
            }
        }
        sqlx::Error::PoolTimedOut => (StatusCode::SERVICE_UNAVAILABLE, "database unavailable".into()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "database error".into()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(Envelope::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: AppError) -> StatusCode {
        e.into_response().status()
    }

    #[test]
    fn maps_variants_to_status() {
        assert_eq!(status_of(AppError::not_found("Job", "x")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Validation("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::BadRequest("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::Conflict("dup".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::PayloadTooLarge("big".into())), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            status_of(AppError::UnsupportedMediaType("xml".into())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(status_of(AppError::Db(sqlx::Error::RowNotFound)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Db(sqlx::Error::PoolTimedOut)), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(AppError::Internal("boom".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(AppError::not_found("Job", "abc").to_string(), "Job 'abc' not found");
    }
}
