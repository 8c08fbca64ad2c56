//! Generic CRUD over one entity descriptor.

use super::{fetch_all, fetch_optional, fetch_scalar, row_to_json, Page};
use crate::error::AppError;
use crate::model::{EntityDef, Record};
use crate::sql::{self, Criteria, OrderBy, PageRequest, TOTAL_COLUMN};
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

/// Repository bound to a pool, a schema and one entity. Cheap to construct per call.
#[derive(Clone, Copy)]
pub struct Repository<'a> {
    pool: &'a PgPool,
    schema: &'a str,
    entity: &'static EntityDef,
}

impl<'a> Repository<'a> {
    pub fn new(pool: &'a PgPool, schema: &'a str, entity: &'static EntityDef) -> Self {
        Repository { pool, schema, entity }
    }

    pub fn entity(&self) -> &'static EntityDef {
        self.entity
    }

    pub fn pool(&self) -> &'a PgPool {
        self.pool
    }

    pub fn schema(&self) -> &'a str {
        self.schema
    }

    #[instrument(skip_all, fields(table = self.entity.table))]
    pub async fn find_all(
        &self,
        criteria: &Criteria,
        limit: Option<u32>,
        offset: Option<u64>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Value>, AppError> {
        let q = sql::select_list(self.entity, self.schema, criteria, order, limit, offset, false);
        let rows = fetch_all(self.pool, &q).await?;
        Ok(rows
            .iter()
            .map(|r| row_to_json(self.entity, r))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Count and fetch in one statement. A second COUNT runs only for a page past the end.
    #[instrument(skip_all, fields(table = self.entity.table, page = page.page, limit = page.limit))]
    pub async fn find_with_pagination(
        &self,
        criteria: &Criteria,
        page: PageRequest,
        order: &OrderBy,
    ) -> Result<Page<Value>, AppError> {
        let q = sql::select_list(
            self.entity,
            self.schema,
            criteria,
            Some(order),
            Some(page.limit),
            Some(page.offset()),
            true,
        );
        let rows = fetch_all(self.pool, &q).await?;
        let total = match rows.first() {
            Some(r) => r.try_get::<i64, _>(TOTAL_COLUMN)?.max(0) as u64,
            None if page.offset() > 0 => self.count(criteria).await?,
            None => 0,
        };
        let data = rows
            .iter()
            .map(|r| row_to_json(self.entity, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { data, total })
    }

    pub async fn find_one_by_id(&self, id: Uuid) -> Result<Option<Value>, AppError> {
        let q = sql::select_by_id(self.entity, self.schema, id);
        let row = fetch_optional(self.pool, &q).await?;
        Ok(row.map(|r| row_to_json(self.entity, &r)).transpose()?)
    }

    pub async fn find_one_or_fail(&self, id: Uuid) -> Result<Value, AppError> {
        self.find_one_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(self.entity.label, id))
    }

    pub async fn find_by_criteria(&self, criteria: &Criteria) -> Result<Vec<Value>, AppError> {
        self.find_all(criteria, None, None, None).await
    }

    pub async fn find_one_by(&self, criteria: &Criteria) -> Result<Option<Value>, AppError> {
        Ok(self.find_all(criteria, Some(1), None, None).await?.into_iter().next())
    }

    #[instrument(skip_all, fields(table = self.entity.table))]
    pub async fn create(&self, data: &Record) -> Result<Value, AppError> {
        let q = sql::insert(self.entity, self.schema, data, false);
        let row = fetch_optional(self.pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        let created = row_to_json(self.entity, &row)?;
        tracing::info!(id = %created["id"], "{} created", self.entity.label);
        Ok(created)
    }

    /// Fails with NotFound when no row has this id.
    #[instrument(skip_all, fields(table = self.entity.table, %id))]
    pub async fn update(&self, id: Uuid, data: &Record) -> Result<Value, AppError> {
        let q = sql::update(self.entity, self.schema, id, data);
        let row = fetch_optional(self.pool, &q)
            .await?
            .ok_or_else(|| AppError::not_found(self.entity.label, id))?;
        tracing::info!("{} updated", self.entity.label);
        Ok(row_to_json(self.entity, &row)?)
    }

    /// Returns false when nothing was deleted.
    #[instrument(skip_all, fields(table = self.entity.table, %id))]
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let q = sql::delete(self.entity, self.schema, id);
        let deleted = fetch_optional(self.pool, &q).await?.is_some();
        if deleted {
            tracing::info!("{} deleted", self.entity.label);
        }
        Ok(deleted)
    }

    pub async fn count(&self, criteria: &Criteria) -> Result<u64, AppError> {
        let q = sql::select_count(self.entity, self.schema, criteria);
        let n: i64 = fetch_scalar(self.pool, &q).await?;
        Ok(n.max(0) as u64)
    }

    pub async fn exists(&self, criteria: &Criteria) -> Result<bool, AppError> {
        let q = sql::select_exists(self.entity, self.schema, criteria);
        Ok(fetch_scalar(self.pool, &q).await?)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        self.exists(&Criteria::new().eq("id", id.to_string())).await
    }

    /// Insert many rows in one transaction, committed once. With `skip_conflicts`,
    /// rows hitting a unique constraint are skipped and absent from the result.
    #[instrument(skip_all, fields(table = self.entity.table, items = items.len()))]
    pub async fn bulk_create(&self, items: &[Record], skip_conflicts: bool) -> Result<Vec<Value>, AppError> {
        let mut out = Vec::with_capacity(items.len());
        let mut tx = self.pool.begin().await?;
        for body in items {
            let q = sql::insert(self.entity, self.schema, body, skip_conflicts);
            if let Some(row) = fetch_optional(&mut *tx, &q).await? {
                out.push(row_to_json(self.entity, &row)?);
            }
        }
        tx.commit().await?;
        tracing::info!(inserted = out.len(), "bulk insert into {}", self.entity.table);
        Ok(out)
    }
}
