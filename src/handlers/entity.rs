//! Generic entity handlers: list, read, read by slug, create, update, delete.
//! The entity comes from an `Extension` installed on the resource's router.

use crate::error::AppError;
use crate::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::model::EntityDef;
use crate::response::{created, success_empty, success_one, success_page, EnvelopeResponse};
use crate::service::{CrudService, ListQuery};
use crate::state::AppState;
use axum::extract::{Extension, State};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub type Entity = Extension<&'static EntityDef>;

pub async fn list(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidQuery(params): ValidQuery<HashMap<String, String>>,
) -> Result<EnvelopeResponse<Vec<Value>>, AppError> {
    let query = ListQuery::from_params(entity, &params)?;
    let page = CrudService::list(&state.repo(entity), &query).await?;
    Ok(success_page(
        format!("{} retrieved successfully", entity.plural),
        page.data,
        page.total,
        query.page.page,
        query.page.limit,
    ))
}

pub async fn read(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let row = CrudService::get(&state.repo(entity), id).await?;
    Ok(success_one(format!("{} retrieved successfully", entity.label), row))
}

pub async fn read_by_slug(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidPath(slug): ValidPath<String>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let row = CrudService::get_by_slug(&state.repo(entity), &slug).await?;
    Ok(success_one(format!("{} retrieved successfully", entity.label), row))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let row = CrudService::create(&state.repo(entity), body).await?;
    Ok(created(format!("{} created successfully", entity.label), row))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let row = CrudService::update(&state.repo(entity), id, body).await?;
    Ok(success_one(format!("{} updated successfully", entity.label), row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(entity): Entity,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<EnvelopeResponse<()>, AppError> {
    CrudService::delete(&state.repo(entity), id).await?;
    Ok(success_empty(format!("{} deleted successfully", entity.label)))
}
