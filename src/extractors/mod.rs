//! Request extractors that reject malformed input with an error envelope before any handler runs.

mod client;

pub use client::{ClientInfo, FORWARDED_FOR_HEADER};

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

/// Query string deserialized into `T`; a type mismatch (e.g. `page=abc`) is a 400.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ValidQuery(value))
    }
}

/// Path parameters; an unparsable id is a 400.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ValidPath(value))
    }
}

/// JSON body. Syntax and shape errors are a 400; an oversized body stays 413 and a missing
/// JSON content type stays 415.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(ValidJson(value))
    }
}

fn json_rejection(e: JsonRejection) -> AppError {
    body_error(e.status(), e.body_text())
}

fn body_error(status: StatusCode, text: String) -> AppError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(text),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(text),
        _ => AppError::BadRequest(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_rejections_keep_size_and_media_type_statuses() {
        assert!(matches!(
            body_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into()),
            AppError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            body_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Expected request with `Content-Type: application/json`".into()),
            AppError::UnsupportedMediaType(_)
        ));
        assert!(matches!(
            body_error(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into()),
            AppError::BadRequest(_)
        ));
    }
}
