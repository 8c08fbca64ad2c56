//! Repositories: a generic descriptor-driven repository plus the filtered job/blog listings
//! and blog-view analytics.

mod generic;
pub mod blog;
pub mod blog_view;
pub mod job;
mod row;

pub use generic::Repository;
pub use row::row_to_json;

use crate::sql::{PgBindValue, QueryBuf};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgExecutor, Postgres};

/// One page of rows plus the total number of matching rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
}

fn bind_all(q: &QueryBuf) -> Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

pub(crate) async fn fetch_all<'e, E>(executor: E, q: &QueryBuf) -> Result<Vec<PgRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    bind_all(q).fetch_all(executor).await
}

pub(crate) async fn fetch_optional<'e, E>(executor: E, q: &QueryBuf) -> Result<Option<PgRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    bind_all(q).fetch_optional(executor).await
}

pub(crate) async fn fetch_scalar<'e, E, T>(executor: E, q: &QueryBuf) -> Result<T, sqlx::Error>
where
    E: PgExecutor<'e>,
    T: Send + Unpin,
    (T,): for<'r> sqlx::FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::clone(p));
    }
    query.fetch_one(executor).await
}
