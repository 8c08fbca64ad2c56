//! Standard response envelope: `{status, message, data, meta?}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Pagination metadata for list responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Rows in this page.
    pub count: u64,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Meta {
    pub fn new(count: u64, total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        Meta {
            count,
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit)),
        }
    }
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Envelope {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            status: Status::Error,
            message: message.into(),
            data: None,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

pub type EnvelopeResponse<T> = (StatusCode, Json<Envelope<T>>);

pub fn success_one<T: Serialize>(message: impl Into<String>, data: T) -> EnvelopeResponse<T> {
    (StatusCode::OK, Json(Envelope::success(message, data)))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> EnvelopeResponse<T> {
    (StatusCode::CREATED, Json(Envelope::success(message, data)))
}

pub fn success_page<T: Serialize>(
    message: impl Into<String>,
    data: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
) -> EnvelopeResponse<Vec<T>> {
    let meta = Meta::new(data.len() as u64, total, page, limit);
    (StatusCode::OK, Json(Envelope::success(message, data).with_meta(meta)))
}

/// Success with `data: null`, used for deletes.
pub fn success_empty(message: impl Into<String>) -> EnvelopeResponse<()> {
    let envelope = Envelope {
        status: Status::Success,
        message: message.into(),
        data: None,
        meta: None,
    };
    (StatusCode::OK, Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Meta::new(10, 25, 2, 10).total_pages, 3);
        assert_eq!(Meta::new(0, 0, 1, 10).total_pages, 0);
        assert_eq!(Meta::new(10, 30, 3, 10).total_pages, 3);
    }

    #[test]
    fn envelope_shape() {
        let (status, Json(body)) = success_page("Jobs retrieved successfully", vec![json!({"id": 1})], 11, 2, 10);
        assert_eq!(status, StatusCode::OK);
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["meta"]["totalPages"], 2);
        assert_eq!(v["meta"]["count"], 1);
        assert_eq!(v["data"][0]["id"], 1);
    }

    #[test]
    fn error_envelope_has_null_data() {
        let v = serde_json::to_value(Envelope::<()>::error("nope")).unwrap();
        assert_eq!(v, json!({"status": "error", "message": "nope", "data": null}));
    }
}
