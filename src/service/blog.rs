//! Blog posts: filtered listing and publish defaults.

use super::crud::{CrudService, Mode};
use crate::error::AppError;
use crate::model::{BlogStatus, Record};
use crate::repository::blog::{self, BlogFilter};
use crate::repository::{Page, Repository};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

pub struct BlogService;

impl BlogService {
    pub async fn list(repo: &Repository<'_>, filter: &BlogFilter) -> Result<Page<Value>, AppError> {
        blog::find_filtered(repo, filter).await
    }

    pub async fn create(repo: &Repository<'_>, body: Value) -> Result<Value, AppError> {
        let mut record = CrudService::prepare(repo.entity(), body, Mode::Create).await?;
        apply_publish_defaults(&mut record);
        repo.create(&record).await
    }

    pub async fn update(repo: &Repository<'_>, id: Uuid, body: Value) -> Result<Value, AppError> {
        CrudService::ensure_exists(repo, id).await?;
        let mut record = CrudService::prepare(repo.entity(), body, Mode::Update).await?;
        apply_publish_defaults(&mut record);
        repo.update(id, &record).await
    }
}

/// A post moved to `Published` is flagged published and stamped unless the body says otherwise.
fn apply_publish_defaults(record: &mut Record) {
    if record.get("status").and_then(Value::as_str) != Some(BlogStatus::Published.as_str()) {
        return;
    }
    record.entry("is_published").or_insert(Value::Bool(true));
    record
        .entry("published_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn publishing_sets_flag_and_timestamp() {
        let mut r = record(json!({"status": "Published"}));
        apply_publish_defaults(&mut r);
        assert_eq!(r["is_published"], json!(true));
        assert!(r["published_at"].as_str().is_some());
    }

    #[test]
    fn explicit_values_win() {
        let mut r = record(json!({"status": "Published", "published_at": "2024-01-01T00:00:00Z"}));
        apply_publish_defaults(&mut r);
        assert_eq!(r["published_at"], json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn drafts_are_untouched() {
        let mut r = record(json!({"status": "Draft"}));
        apply_publish_defaults(&mut r);
        assert!(!r.contains_key("is_published"));
    }
}
