//! Jobs: filtered listing and writes that carry skill/tag links.

use super::crud::{CrudService, Mode};
use crate::case::record_keys_to_snake_case;
use crate::error::AppError;
use crate::repository::job::{self, JobFilter, JobLinks};
use crate::repository::{Page, Repository};
use serde_json::Value;
use uuid::Uuid;

pub struct JobService;

impl JobService {
    pub async fn list(repo: &Repository<'_>, filter: &JobFilter) -> Result<Page<Value>, AppError> {
        job::find_filtered(repo, filter).await
    }

    pub async fn get(repo: &Repository<'_>, id: Uuid) -> Result<Value, AppError> {
        let mut row = CrudService::get(repo, id).await?;
        job::attach_links(repo.pool(), repo.schema(), std::slice::from_mut(&mut row)).await?;
        Ok(row)
    }

    pub async fn get_by_slug(repo: &Repository<'_>, slug: &str) -> Result<Value, AppError> {
        let mut row = CrudService::get_by_slug(repo, slug).await?;
        job::attach_links(repo.pool(), repo.schema(), std::slice::from_mut(&mut row)).await?;
        Ok(row)
    }

    pub async fn create(repo: &Repository<'_>, body: Value) -> Result<Value, AppError> {
        let (body, links) = split_links(body)?;
        let record = CrudService::prepare(repo.entity(), body, Mode::Create).await?;
        job::create_with_links(repo, &record, &links).await
    }

    pub async fn update(repo: &Repository<'_>, id: Uuid, body: Value) -> Result<Value, AppError> {
        CrudService::ensure_exists(repo, id).await?;
        let (body, links) = split_links(body)?;
        let record = CrudService::prepare(repo.entity(), body, Mode::Update).await?;
        job::update_with_links(repo, id, &record, &links).await
    }
}

fn split_links(body: Value) -> Result<(Value, JobLinks), AppError> {
    let Value::Object(raw) = body else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    let mut raw = record_keys_to_snake_case(raw);
    let links = JobLinks::take_from(&mut raw)?;
    Ok((Value::Object(raw), links))
}
