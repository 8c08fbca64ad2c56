//! Blog post handlers: filtered list and writes applying publish defaults.

use crate::error::AppError;
use crate::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::model::BLOG_POSTS;
use crate::repository::blog::BlogFilter;
use crate::response::{created, success_one, success_page, EnvelopeResponse};
use crate::service::BlogService;
use crate::state::AppState;
use axum::extract::State;
use serde_json::Value;
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<BlogFilter>,
) -> Result<EnvelopeResponse<Vec<Value>>, AppError> {
    let page = BlogService::list(&state.repo(&BLOG_POSTS), &filter).await?;
    let req = filter.page_request();
    Ok(success_page(
        "Blog posts retrieved successfully",
        page.data,
        page.total,
        req.page,
        req.limit,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let post = BlogService::create(&state.repo(&BLOG_POSTS), body).await?;
    Ok(created("Blog post created successfully", post))
}

pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let post = BlogService::update(&state.repo(&BLOG_POSTS), id, body).await?;
    Ok(success_one("Blog post updated successfully", post))
}
