//! Blog views: recording and analytics.

use super::crud::{CrudService, Mode};
use crate::error::AppError;
use crate::model::{BLOG_POSTS, BLOG_VIEWS};
use crate::repository::blog_view::{self, AnalyticsQuery, DailyViews, PostViewStats, TopPost, ViewsOverview};
use crate::repository::Repository;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct BlogViewService;

impl BlogViewService {
    pub async fn record(pool: &PgPool, schema: &str, body: Value) -> Result<Value, AppError> {
        let record = CrudService::prepare(&BLOG_VIEWS, body, Mode::Create).await?;
        blog_view::record_view(pool, schema, &record).await
    }

    /// Stats for one post; 404 when the post does not exist.
    pub async fn post_stats(pool: &PgPool, schema: &str, post_id: Uuid) -> Result<PostViewStats, AppError> {
        CrudService::ensure_exists(&Repository::new(pool, schema, &BLOG_POSTS), post_id).await?;
        blog_view::post_stats(pool, schema, post_id).await
    }

    pub async fn overview(pool: &PgPool, schema: &str) -> Result<ViewsOverview, AppError> {
        blog_view::overview(pool, schema).await
    }

    pub async fn trends(pool: &PgPool, schema: &str, q: &AnalyticsQuery) -> Result<Vec<DailyViews>, AppError> {
        blog_view::trends(pool, schema, q.days()).await
    }

    pub async fn top_posts(pool: &PgPool, schema: &str, q: &AnalyticsQuery) -> Result<Vec<TopPost>, AppError> {
        blog_view::top_posts(pool, schema, q.limit(), q.days()).await
    }
}
