//! Blog view recording and analytics. Aggregates are raw SQL over `blog_views`.

use super::{fetch_optional, row_to_json};
use crate::error::AppError;
use crate::model::{Record, BLOG_VIEWS};
use crate::sql::{self, qualified_table};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

// A visitor is the user when known, else the client address.
const VISITOR: &str = "COALESCE(\"user_id\"::text, \"ip_address\")";

/// Insert a view and bump the post's counter in one transaction.
pub async fn record_view(pool: &PgPool, schema: &str, data: &Record) -> Result<Value, AppError> {
    let mut tx = pool.begin().await?;
    let q = sql::insert(&BLOG_VIEWS, schema, data, false);
    let row = fetch_optional(&mut *tx, &q)
        .await?
        .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
    let view = row_to_json(&BLOG_VIEWS, &row)?;
    let post_id = view
        .get("blog_post_id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::Internal("blog view without blog_post_id".into()))?;
    sqlx::query(&format!(
        "UPDATE {} SET \"views_count\" = \"views_count\" + 1 WHERE \"id\" = $1",
        qualified_table(schema, "blog_posts")
    ))
    .bind(post_id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    tracing::debug!(%post_id, "blog view recorded");
    Ok(view)
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PostViewStats {
    pub total_views: i64,
    pub unique_visitors: i64,
    pub views_last_7_days: i64,
    pub first_viewed_at: Option<DateTime<Utc>>,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

pub async fn post_stats(pool: &PgPool, schema: &str, post_id: Uuid) -> Result<PostViewStats, AppError> {
    let sql = format!(
        "SELECT COUNT(*) AS total_views, \
                COUNT(DISTINCT {v}) AS unique_visitors, \
                COUNT(*) FILTER (WHERE \"created_at\" >= NOW() - INTERVAL '7 days') AS views_last_7_days, \
                MIN(\"created_at\") AS first_viewed_at, \
                MAX(\"created_at\") AS last_viewed_at \
         FROM {t} WHERE \"blog_post_id\" = $1",
        v = VISITOR,
        t = qualified_table(schema, BLOG_VIEWS.table),
    );
    Ok(sqlx::query_as(&sql).bind(post_id).fetch_one(pool).await?)
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ViewsOverview {
    pub total_views: i64,
    pub unique_visitors: i64,
    pub posts_viewed: i64,
    pub views_today: i64,
}

pub async fn overview(pool: &PgPool, schema: &str) -> Result<ViewsOverview, AppError> {
    let sql = format!(
        "SELECT COUNT(*) AS total_views, \
                COUNT(DISTINCT {v}) AS unique_visitors, \
                COUNT(DISTINCT \"blog_post_id\") AS posts_viewed, \
                COUNT(*) FILTER (WHERE \"created_at\" >= date_trunc('day', NOW())) AS views_today \
         FROM {t}",
        v = VISITOR,
        t = qualified_table(schema, BLOG_VIEWS.table),
    );
    Ok(sqlx::query_as(&sql).fetch_one(pool).await?)
}

/// Window for analytics queries.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
    pub limit: Option<i64>,
}

impl AnalyticsQuery {
    pub const DEFAULT_DAYS: i64 = 30;
    pub const MAX_DAYS: i64 = 365;
    pub const DEFAULT_TOP: i64 = 10;
    pub const MAX_TOP: i64 = 100;

    pub fn days(&self) -> i32 {
        self.days.unwrap_or(Self::DEFAULT_DAYS).clamp(1, Self::MAX_DAYS) as i32
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_TOP).clamp(1, Self::MAX_TOP)
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailyViews {
    pub day: NaiveDate,
    pub views: i64,
    pub unique_visitors: i64,
}

/// Views per day over the last `days` days, oldest first. Days without views are omitted.
pub async fn trends(pool: &PgPool, schema: &str, days: i32) -> Result<Vec<DailyViews>, AppError> {
    let sql = format!(
        "SELECT (date_trunc('day', \"created_at\"))::date AS day, \
                COUNT(*) AS views, \
                COUNT(DISTINCT {v}) AS unique_visitors \
         FROM {t} WHERE \"created_at\" >= NOW() - make_interval(days => $1) \
         GROUP BY 1 ORDER BY 1",
        v = VISITOR,
        t = qualified_table(schema, BLOG_VIEWS.table),
    );
    Ok(sqlx::query_as(&sql).bind(days).fetch_all(pool).await?)
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub views: i64,
}

pub async fn top_posts(pool: &PgPool, schema: &str, limit: i64, days: i32) -> Result<Vec<TopPost>, AppError> {
    let sql = format!(
        "SELECT p.\"id\", p.\"title\", p.\"slug\", COUNT(v.\"id\") AS views \
         FROM {views} v JOIN {posts} p ON p.\"id\" = v.\"blog_post_id\" \
         WHERE v.\"created_at\" >= NOW() - make_interval(days => $1) \
         GROUP BY p.\"id\", p.\"title\", p.\"slug\" \
         ORDER BY views DESC, p.\"title\" LIMIT $2",
        views = qualified_table(schema, BLOG_VIEWS.table),
        posts = qualified_table(schema, "blog_posts"),
    );
    Ok(sqlx::query_as(&sql).bind(days).bind(limit).fetch_all(pool).await?)
}
