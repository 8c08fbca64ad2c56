//! Generic CRUD service: request preparation, existence rules and list query parsing.

use super::validation::RequestValidator;
use crate::case::{record_keys_to_snake_case, to_snake_case};
use crate::error::AppError;
use crate::model::{ColType, EntityDef, Record};
use crate::repository::{Page, Repository};
use crate::sql::{Condition, Criteria, OrderBy, PageRequest, SortOrder};
use chrono::DateTime;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

/// Whether a body is for a create (required fields enforced, slug derived) or an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a single `-`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Parsed list parameters for a generic `GET /{path}`.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub page: PageRequest,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub criteria: Criteria,
}

impl ListQuery {
    /// `page`, `limit`, `sortBy`, `sortOrder`, `keyword`, plus equality filters on known columns.
    /// Unknown keys are ignored; malformed values are a 400.
    pub fn from_params(entity: &EntityDef, params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut page = None;
        let mut limit = None;
        let mut q = ListQuery::default();
        let mut keyword = None;
        for (k, v) in params {
            let key = to_snake_case(k);
            match key.as_str() {
                "page" => page = Some(parse_int("page", v)?),
                "limit" => limit = Some(parse_int("limit", v)?),
                "sort_by" => q.sort_by = Some(v.clone()),
                "sort_order" => q.sort_order = SortOrder::parse(v),
                "keyword" | "search" => keyword = Some(v.as_str()),
                _ => {
                    let Some(col) = entity.column(&key).filter(|c| !c.sensitive) else {
                        continue;
                    };
                    if let Some(value) = filter_value(col.name, col.ty, v)? {
                        q.criteria.push(Condition::Eq(key, value));
                    }
                }
            }
        }
        if let Some(kw) = keyword {
            q.criteria = q.criteria.contains(entity.search_columns, kw);
        }
        q.page = PageRequest::new(page, limit);
        Ok(q)
    }

    pub fn order_by(&self, entity: &EntityDef) -> OrderBy {
        OrderBy::new(entity.resolve_sort(self.sort_by.as_deref()), self.sort_order)
    }
}

fn parse_int(name: &str, v: &str) -> Result<i64, AppError> {
    v.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer", name)))
}

/// Convert a query-string value to the column's JSON shape. Array columns are not filterable.
fn filter_value(name: &str, ty: ColType, s: &str) -> Result<Option<Value>, AppError> {
    let bad = |what: &str| AppError::BadRequest(format!("{} must be {}", name, what));
    let s = s.trim();
    Ok(Some(match ty {
        ColType::Uuid => Value::String(Uuid::parse_str(s).map_err(|_| bad("a UUID"))?.to_string()),
        ColType::Int => Value::from(s.parse::<i32>().map_err(|_| bad("an integer"))?),
        ColType::Numeric => Value::from(s.parse::<f64>().map_err(|_| bad("a number"))?),
        ColType::Bool => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => return Err(bad("a boolean")),
        },
        ColType::Timestamptz => {
            DateTime::parse_from_rfc3339(s).map_err(|_| bad("an RFC 3339 timestamp"))?;
            Value::String(s.to_string())
        }
        ColType::Text | ColType::Varchar(_) => Value::String(s.to_string()),
        ColType::TextArray => return Ok(None),
    }))
}

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

pub struct CrudService;

impl CrudService {
    /// Turn a raw JSON body into a validated record of writable columns:
    /// keys normalized to snake_case, unknown and read-only keys dropped, missing slug derived,
    /// `password` hashed into `password_hash`.
    pub async fn prepare(entity: &EntityDef, body: Value, mode: Mode) -> Result<Record, AppError> {
        let Value::Object(raw) = body else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        let mut raw = record_keys_to_snake_case(raw);
        let password = match entity.column("password_hash") {
            Some(_) => raw.remove("password"),
            None => None,
        };
        let mut record: Record = raw
            .into_iter()
            .filter(|(k, _)| match entity.column(k) {
                Some(c) if c.is_writable() => true,
                _ => {
                    tracing::debug!(table = entity.table, key = %k, "dropping non-writable key");
                    false
                }
            })
            .collect();

        if let (Mode::Create, Some(source)) = (mode, entity.slug_source) {
            let missing = record.get("slug").map_or(true, |v| v.is_null() || v.as_str() == Some(""));
            if missing {
                let derived = record.get(source).and_then(Value::as_str).map(slugify).unwrap_or_default();
                if derived.is_empty() {
                    return Err(AppError::Validation(format!("slug is required (cannot derive from {})", source)));
                }
                record.insert("slug".into(), Value::String(derived));
            }
        }

        match mode {
            Mode::Create => RequestValidator::validate(entity, &record)?,
            Mode::Update => RequestValidator::validate_partial(entity, &record)?,
        }

        if let Some(pw) = password {
            let pw = match pw {
                Value::String(s) if s.chars().count() >= MIN_PASSWORD_LEN => s,
                _ => {
                    return Err(AppError::Validation(format!(
                        "password must be a string of at least {} characters",
                        MIN_PASSWORD_LEN
                    )))
                }
            };
            record.insert("password_hash".into(), Value::String(hash_password(pw).await?));
        }
        Ok(record)
    }

    pub async fn list(repo: &Repository<'_>, query: &ListQuery) -> Result<Page<Value>, AppError> {
        repo.find_with_pagination(&query.criteria, query.page, &query.order_by(repo.entity()))
            .await
    }

    pub async fn get(repo: &Repository<'_>, id: Uuid) -> Result<Value, AppError> {
        repo.find_one_or_fail(id).await
    }

    pub async fn get_by_slug(repo: &Repository<'_>, slug: &str) -> Result<Value, AppError> {
        let entity = repo.entity();
        if !entity.has_slug() {
            return Err(AppError::NotFound(format!("{} slug route", entity.label)));
        }
        repo.find_one_by(&Criteria::new().eq("slug", slug))
            .await?
            .ok_or_else(|| AppError::not_found(entity.label, slug))
    }

    pub async fn create(repo: &Repository<'_>, body: Value) -> Result<Value, AppError> {
        let record = Self::prepare(repo.entity(), body, Mode::Create).await?;
        repo.create(&record).await
    }

    /// Partial update; the row must exist.
    pub async fn update(repo: &Repository<'_>, id: Uuid, body: Value) -> Result<Value, AppError> {
        Self::ensure_exists(repo, id).await?;
        let record = Self::prepare(repo.entity(), body, Mode::Update).await?;
        repo.update(id, &record).await
    }

    pub async fn delete(repo: &Repository<'_>, id: Uuid) -> Result<(), AppError> {
        if repo.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(repo.entity().label, id))
        }
    }

    pub async fn ensure_exists(repo: &Repository<'_>, id: Uuid) -> Result<(), AppError> {
        if repo.exists_by_id(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(repo.entity().label, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JOBS, SKILLS, USERS};
    use serde_json::json;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Backend Engineer"), "backend-engineer");
        assert_eq!(slugify("  C++ / Rust!! "), "c-rust");
        assert_eq!(slugify("Node.js"), "node-js");
        assert_eq!(slugify("---"), "");
    }

    #[tokio::test]
    async fn prepare_normalizes_keys_and_drops_read_only() {
        let company = Uuid::new_v4();
        let body = json!({
            "Title": "Backend Engineer",
            "Slug": "backend-engineer",
            "Description": "Build APIs",
            "CompanyId": company.to_string(),
            "JobType": "Full-time",
            "viewsCount": 500,
            "id": Uuid::new_v4().to_string(),
            "unknown": 1,
        });
        let rec = CrudService::prepare(&JOBS, body, Mode::Create).await.unwrap();
        assert_eq!(rec.get("slug"), Some(&json!("backend-engineer")));
        assert_eq!(rec.get("company_id"), Some(&json!(company.to_string())));
        assert!(!rec.contains_key("views_count"));
        assert!(!rec.contains_key("id"));
        assert!(!rec.contains_key("unknown"));
    }

    #[tokio::test]
    async fn prepare_derives_slug_on_create_only() {
        let rec = CrudService::prepare(&SKILLS, json!({"name": "Rust Async"}), Mode::Create)
            .await
            .unwrap();
        assert_eq!(rec.get("slug"), Some(&json!("rust-async")));
        let rec = CrudService::prepare(&SKILLS, json!({"name": "Go"}), Mode::Update).await.unwrap();
        assert!(!rec.contains_key("slug"));
    }

    #[tokio::test]
    async fn prepare_rejects_bad_bodies() {
        assert!(matches!(
            CrudService::prepare(&SKILLS, json!([1]), Mode::Create).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            CrudService::prepare(&JOBS, json!({"title": "x"}), Mode::Create).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn prepare_hashes_password() {
        let body = json!({"email": "dev@example.com", "password": "correct horse", "password_hash": "nope"});
        let rec = CrudService::prepare(&USERS, body, Mode::Create).await.unwrap();
        let hash = rec.get("password_hash").and_then(Value::as_str).unwrap();
        assert!(bcrypt::verify("correct horse", hash).unwrap());
        assert!(!rec.contains_key("password"));

        let short = json!({"email": "dev@example.com", "password": "short"});
        assert!(CrudService::prepare(&USERS, short, Mode::Create).await.is_err());
    }

    #[test]
    fn list_query_from_params() {
        let company = Uuid::new_v4();
        let params: HashMap<String, String> = [
            ("page", "2"),
            ("limit", "5"),
            ("sortBy", "title"),
            ("sortOrder", "asc"),
            ("companyId", company.to_string().as_str()),
            ("isRemote", "true"),
            ("bogus", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let q = ListQuery::from_params(&JOBS, &params).unwrap();
        assert_eq!(q.page, PageRequest { page: 2, limit: 5 });
        assert_eq!(q.order_by(&JOBS), OrderBy::new("title", SortOrder::Asc));
        assert!(q
            .criteria
            .conditions
            .contains(&Condition::Eq("company_id".into(), json!(company.to_string()))));
        assert!(q.criteria.conditions.contains(&Condition::Eq("is_remote".into(), json!(true))));
        assert_eq!(q.criteria.conditions.len(), 2);
    }

    #[test]
    fn list_query_rejects_malformed_values() {
        let params = |k: &str, v: &str| HashMap::from([(k.to_string(), v.to_string())]);
        assert!(ListQuery::from_params(&JOBS, &params("page", "abc")).is_err());
        assert!(ListQuery::from_params(&JOBS, &params("companyId", "xyz")).is_err());
        assert!(ListQuery::from_params(&JOBS, &params("salaryMin", "lots")).is_err());
        assert!(ListQuery::from_params(&JOBS, &params("isRemote", "maybe")).is_err());
    }
}
