//! Job handlers: filtered list and writes carrying skill/tag ids.

use crate::error::AppError;
use crate::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::model::JOBS;
use crate::repository::job::JobFilter;
use crate::response::{created, success_one, success_page, EnvelopeResponse};
use crate::service::JobService;
use crate::state::AppState;
use axum::extract::State;
use serde_json::Value;
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<JobFilter>,
) -> Result<EnvelopeResponse<Vec<Value>>, AppError> {
    let page = JobService::list(&state.repo(&JOBS), &filter).await?;
    let req = filter.page_request();
    Ok(success_page("Jobs retrieved successfully", page.data, page.total, req.page, req.limit))
}

pub async fn read(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let job = JobService::get(&state.repo(&JOBS), id).await?;
    Ok(success_one("Job retrieved successfully", job))
}

pub async fn read_by_slug(
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let job = JobService::get_by_slug(&state.repo(&JOBS), &slug).await?;
    Ok(success_one("Job retrieved successfully", job))
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let job = JobService::create(&state.repo(&JOBS), body).await?;
    Ok(created("Job created successfully", job))
}

pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let job = JobService::update(&state.repo(&JOBS), id, body).await?;
    Ok(success_one("Job updated successfully", job))
}
