//! Job listings: filter translation, skill/tag link maintenance and link loading.

use super::{fetch_optional, row_to_json, Page, Repository};
use crate::error::AppError;
use crate::model::{ExperienceLevel, JobStatus, JobType, Record};
use crate::sql::{self, parse_id_list, qualified_table, quoted, Criteria, OrderBy, PageRequest, SortOrder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Query parameters accepted by `GET /jobs`. Keys may be camelCase or snake_case.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "category_id")]
    pub category_id: Option<Uuid>,
    #[serde(alias = "company_id")]
    pub company_id: Option<Uuid>,
    #[serde(alias = "salary_min")]
    pub salary_min: Option<f64>,
    #[serde(alias = "salary_max")]
    pub salary_max: Option<f64>,
    #[serde(alias = "job_type")]
    pub job_type: Option<JobType>,
    #[serde(alias = "experience_level")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(alias = "is_remote")]
    pub is_remote: Option<bool>,
    pub status: Option<JobStatus>,
    /// Comma-separated skill ids.
    #[serde(alias = "skill_ids")]
    pub skill_ids: Option<String>,
    /// Comma-separated job tag ids.
    #[serde(alias = "tag_ids")]
    pub tag_ids: Option<String>,
    #[serde(alias = "sort_by")]
    pub sort_by: Option<String>,
    #[serde(alias = "sort_order")]
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl JobFilter {
    pub fn to_criteria(&self) -> Result<Criteria, AppError> {
        let mut c = Criteria::new();
        if let Some(kw) = &self.keyword {
            c = c.contains(&["title", "description"], kw);
        }
        if let Some(loc) = &self.location {
            c = c.contains(&["location"], loc);
        }
        if let Some(id) = self.category_id {
            c = c.eq("category_id", id.to_string());
        }
        if let Some(id) = self.company_id {
            c = c.eq("company_id", id.to_string());
        }
        if let Some(min) = self.salary_min {
            c = c.gte("salary_min", min);
        }
        if let Some(max) = self.salary_max {
            c = c.lte("salary_max", max);
        }
        if let Some(t) = self.job_type {
            c = c.eq("job_type", t.as_str());
        }
        if let Some(level) = self.experience_level {
            c = c.eq("experience_level", level.as_str());
        }
        if let Some(remote) = self.is_remote {
            c = c.eq("is_remote", remote);
        }
        let status = self.status.unwrap_or(JobStatus::Active);
        c = c.eq("status", status.as_str());
        if let Some(raw) = &self.skill_ids {
            let ids = parse_id_list(raw).map_err(AppError::BadRequest)?;
            c = c.linked_to_any("job_skills", "job_id", "skill_id", ids);
        }
        if let Some(raw) = &self.tag_ids {
            let ids = parse_id_list(raw).map_err(AppError::BadRequest)?;
            c = c.linked_to_any("job_job_tags", "job_id", "job_tag_id", ids);
        }
        Ok(c)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn order_by(&self) -> OrderBy {
        let column = crate::model::JOBS.resolve_sort(self.sort_by.as_deref());
        OrderBy::new(column, self.sort_order.unwrap_or_default())
    }
}

/// Filtered, paginated job list with `skills` and `tags` attached to each row.
pub async fn find_filtered(repo: &Repository<'_>, filter: &JobFilter) -> Result<Page<Value>, AppError> {
    let criteria = filter.to_criteria()?;
    let mut page = repo
        .find_with_pagination(&criteria, filter.page_request(), &filter.order_by())
        .await?;
    attach_links(repo.pool(), repo.schema(), &mut page.data).await?;
    Ok(page)
}

/// Which link table a set of ids replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobLink {
    Skills,
    Tags,
}

impl JobLink {
    fn link_table(self) -> &'static str {
        match self {
            JobLink::Skills => "job_skills",
            JobLink::Tags => "job_job_tags",
        }
    }

    fn target_column(self) -> &'static str {
        match self {
            JobLink::Skills => "skill_id",
            JobLink::Tags => "job_tag_id",
        }
    }

    fn target_table(self) -> &'static str {
        match self {
            JobLink::Skills => "skills",
            JobLink::Tags => "job_tags",
        }
    }

    fn response_key(self) -> &'static str {
        match self {
            JobLink::Skills => "skills",
            JobLink::Tags => "tags",
        }
    }
}

/// Replace the job's links of one kind. Runs on the caller's connection so it shares the job write's transaction.
pub async fn replace_links(
    conn: &mut PgConnection,
    schema: &str,
    job_id: Uuid,
    link: JobLink,
    ids: &[Uuid],
) -> Result<(), AppError> {
    let table = qualified_table(schema, link.link_table());
    let target = quoted(link.target_column());
    sqlx::query(&format!("DELETE FROM {} WHERE \"job_id\" = $1", table))
        .bind(job_id)
        .execute(&mut *conn)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    sqlx::query(&format!(
        "INSERT INTO {} (\"job_id\", {}) SELECT $1, unnest($2::uuid[]) ON CONFLICT DO NOTHING",
        table, target
    ))
    .bind(job_id)
    .bind(ids)
    .execute(&mut *conn)
    .await?;
    tracing::debug!(%job_id, links = ids.len(), table = link.link_table(), "job links replaced");
    Ok(())
}

/// Link replacements carried by a job write. `None` leaves that kind of link untouched.
#[derive(Debug, Default, PartialEq)]
pub struct JobLinks {
    pub skills: Option<Vec<Uuid>>,
    pub tags: Option<Vec<Uuid>>,
}

impl JobLinks {
    /// Remove `skill_ids` / `tag_ids` from a job body whose keys are already snake_case.
    pub fn take_from(body: &mut Map<String, Value>) -> Result<Self, AppError> {
        Ok(JobLinks {
            skills: take_link_ids(body, "skill_ids")?,
            tags: take_link_ids(body, "tag_ids")?,
        })
    }

    async fn apply(&self, conn: &mut PgConnection, schema: &str, job_id: Uuid) -> Result<(), AppError> {
        if let Some(ids) = &self.skills {
            replace_links(conn, schema, job_id, JobLink::Skills, ids).await?;
        }
        if let Some(ids) = &self.tags {
            replace_links(conn, schema, job_id, JobLink::Tags, ids).await?;
        }
        Ok(())
    }
}

fn job_id_of(row: &Value) -> Result<Uuid, AppError> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::Internal("job row without id".into()))
}

/// Insert a job and its links in one transaction.
pub async fn create_with_links(repo: &Repository<'_>, data: &Record, links: &JobLinks) -> Result<Value, AppError> {
    let mut tx = repo.pool().begin().await?;
    let q = sql::insert(repo.entity(), repo.schema(), data, false);
    let row = fetch_optional(&mut *tx, &q)
        .await?
        .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
    let mut job = row_to_json(repo.entity(), &row)?;
    links.apply(&mut *tx, repo.schema(), job_id_of(&job)?).await?;
    tx.commit().await?;
    tracing::info!(id = %job["id"], "Job created");
    attach_links(repo.pool(), repo.schema(), std::slice::from_mut(&mut job)).await?;
    Ok(job)
}

/// Update a job and replace its links in one transaction.
pub async fn update_with_links(
    repo: &Repository<'_>,
    id: Uuid,
    data: &Record,
    links: &JobLinks,
) -> Result<Value, AppError> {
    let mut tx = repo.pool().begin().await?;
    let q = sql::update(repo.entity(), repo.schema(), id, data);
    let row = fetch_optional(&mut *tx, &q)
        .await?
        .ok_or_else(|| AppError::not_found(repo.entity().label, id))?;
    let mut job = row_to_json(repo.entity(), &row)?;
    links.apply(&mut *tx, repo.schema(), id).await?;
    tx.commit().await?;
    tracing::info!(%id, "Job updated");
    attach_links(repo.pool(), repo.schema(), std::slice::from_mut(&mut job)).await?;
    Ok(job)
}

#[derive(sqlx::FromRow)]
struct LinkedRef {
    job_id: Uuid,
    id: Uuid,
    name: String,
    slug: String,
}

async fn load_links(
    pool: &PgPool,
    schema: &str,
    link: JobLink,
    job_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Value>>, AppError> {
    let sql = format!(
        "SELECT l.\"job_id\", t.\"id\", t.\"name\", t.\"slug\" FROM {} l JOIN {} t ON t.\"id\" = l.{} \
         WHERE l.\"job_id\" = ANY($1) ORDER BY t.\"name\"",
        qualified_table(schema, link.link_table()),
        qualified_table(schema, link.target_table()),
        quoted(link.target_column()),
    );
    let rows: Vec<LinkedRef> = sqlx::query_as(&sql).bind(job_ids).fetch_all(pool).await?;
    let mut out: HashMap<Uuid, Vec<Value>> = HashMap::new();
    for r in rows {
        out.entry(r.job_id)
            .or_default()
            .push(json!({ "id": r.id, "name": r.name, "slug": r.slug }));
    }
    Ok(out)
}

/// Batch-load skills and tags for the given job rows (two queries regardless of row count).
pub async fn attach_links(pool: &PgPool, schema: &str, jobs: &mut [Value]) -> Result<(), AppError> {
    let ids: Vec<Uuid> = jobs
        .iter()
        .filter_map(|j| j.get("id").and_then(Value::as_str))
        .filter_map(|s| Uuid::parse_str(s).ok())
        .collect();
    if ids.is_empty() {
        return Ok(());
    }
    for link in [JobLink::Skills, JobLink::Tags] {
        let mut by_job = load_links(pool, schema, link, &ids).await?;
        for job in jobs.iter_mut() {
            let linked = job
                .get("id")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .and_then(|id| by_job.remove(&id))
                .unwrap_or_default();
            if let Value::Object(map) = job {
                map.insert(link.response_key().to_string(), Value::Array(linked));
            }
        }
    }
    Ok(())
}

/// Pull `skill_ids` / `tag_ids` out of a job body. `None` means the key was absent (links untouched).
pub fn take_link_ids(body: &mut Map<String, Value>, key: &str) -> Result<Option<Vec<Uuid>>, AppError> {
    let Some(v) = body.remove(key) else {
        return Ok(None);
    };
    match v {
        Value::Null => Ok(Some(Vec::new())),
        Value::String(s) => parse_id_list(&s).map(Some).map_err(AppError::Validation),
        Value::Array(items) => items
            .iter()
            .map(|i| {
                i.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| AppError::Validation(format!("{} must contain UUIDs", key)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(AppError::Validation(format!("{} must be an array of UUIDs", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JOBS;
    use crate::sql::{select_list, Condition, PgBindValue};

    fn filter(query: &str) -> JobFilter {
        serde_json::from_value(serde_json::from_str(query).unwrap()).unwrap()
    }

    #[test]
    fn status_defaults_to_active() {
        let c = JobFilter::default().to_criteria().unwrap();
        assert_eq!(c.conditions, vec![Condition::Eq("status".into(), json!("Active"))]);
    }

    #[test]
    fn salary_bounds_use_their_own_columns() {
        let f = filter(r#"{"salaryMin": 50000, "salaryMax": 90000, "status": "Draft"}"#);
        let c = f.to_criteria().unwrap();
        let q = select_list(&JOBS, "s", &c, None, None, None, false);
        assert!(q.sql.contains("main.\"salary_min\" >= $1::numeric"));
        assert!(q.sql.contains("main.\"salary_max\" <= $2::numeric"));
        assert!(q.sql.contains("main.\"status\" = $3::text"));
        assert_eq!(q.params[2], PgBindValue::Text("Draft".into()));
    }

    #[test]
    fn skill_and_tag_ids_filter_in_sql() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let f = JobFilter {
            skill_ids: Some(format!("{},{}", a, b)),
            tag_ids: Some(a.to_string()),
            ..Default::default()
        };
        let c = f.to_criteria().unwrap();
        assert!(c.conditions.contains(&Condition::LinkedToAny {
            link_table: "job_skills",
            owner_column: "job_id",
            target_column: "skill_id",
            ids: vec![a, b],
        }));
        assert!(c.conditions.contains(&Condition::LinkedToAny {
            link_table: "job_job_tags",
            owner_column: "job_id",
            target_column: "job_tag_id",
            ids: vec![a],
        }));
    }

    #[test]
    fn bad_id_list_is_rejected() {
        let f = JobFilter {
            skill_ids: Some("not-a-uuid".into()),
            ..Default::default()
        };
        assert!(matches!(f.to_criteria(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn sort_and_page_fall_back_to_defaults() {
        let f = filter(r#"{"sortBy": "salaryMin", "sortOrder": "asc", "page": 2, "limit": 10}"#);
        assert_eq!(f.order_by(), OrderBy::new("salary_min", SortOrder::Asc));
        assert_eq!(f.page_request().offset(), 10);
        let f = filter(r#"{"sortBy": "password_hash"}"#);
        assert_eq!(f.order_by(), OrderBy::new("created_at", SortOrder::Desc));
    }

    #[test]
    fn snake_case_keys_are_accepted() {
        let id = Uuid::new_v4();
        let f = filter(&format!(r#"{{"company_id": "{}", "job_type": "full-time", "is_remote": true}}"#, id));
        assert_eq!(f.company_id, Some(id));
        assert_eq!(f.job_type, Some(JobType::FullTime));
        assert_eq!(f.is_remote, Some(true));
    }

    #[test]
    fn link_ids_from_body() {
        let a = Uuid::new_v4();
        let mut body = Map::new();
        body.insert("skill_ids".into(), json!([a.to_string()]));
        body.insert("tag_ids".into(), json!(null));
        assert_eq!(take_link_ids(&mut body, "skill_ids").unwrap(), Some(vec![a]));
        assert_eq!(take_link_ids(&mut body, "tag_ids").unwrap(), Some(vec![]));
        assert_eq!(take_link_ids(&mut body, "skill_ids").unwrap(), None);
        body.insert("skill_ids".into(), json!([1]));
        assert!(take_link_ids(&mut body, "skill_ids").is_err());
    }
}
