//! Blog view recording and analytics handlers.

use crate::error::AppError;
use crate::extractors::{ClientInfo, ValidJson, ValidPath, ValidQuery};
use crate::repository::blog_view::{AnalyticsQuery, DailyViews, PostViewStats, TopPost, ViewsOverview};
use crate::response::{created, success_one, EnvelopeResponse};
use crate::service::BlogViewService;
use crate::state::AppState;
use axum::extract::State;
use serde_json::Value;
use uuid::Uuid;

/// Request headers fill `ip_address`, `user_agent` and `referrer` when the body omits them.
fn with_client_info(body: Value, client: ClientInfo) -> Value {
    let Value::Object(mut map) = body else {
        return body;
    };
    for (key, camel, value) in [
        ("ip_address", "ipAddress", client.ip_address),
        ("user_agent", "userAgent", client.user_agent),
        ("referrer", "referrer", client.referrer),
    ] {
        if let Some(v) = value {
            if !map.contains_key(key) && !map.contains_key(camel) {
                map.insert(key.to_string(), Value::String(v));
            }
        }
    }
    Value::Object(map)
}

pub async fn record(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(body): ValidJson<Value>,
) -> Result<EnvelopeResponse<Value>, AppError> {
    let view = BlogViewService::record(&state.pool, &state.schema, with_client_info(body, client)).await?;
    Ok(created("Blog view recorded successfully", view))
}

pub async fn post_stats(
    State(state): State<AppState>,
    ValidPath(post_id): ValidPath<Uuid>,
) -> Result<EnvelopeResponse<PostViewStats>, AppError> {
    let stats = BlogViewService::post_stats(&state.pool, &state.schema, post_id).await?;
    Ok(success_one("Blog view stats retrieved successfully", stats))
}

pub async fn overview(State(state): State<AppState>) -> Result<EnvelopeResponse<ViewsOverview>, AppError> {
    let overview = BlogViewService::overview(&state.pool, &state.schema).await?;
    Ok(success_one("Blog view overview retrieved successfully", overview))
}

pub async fn trends(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<AnalyticsQuery>,
) -> Result<EnvelopeResponse<Vec<DailyViews>>, AppError> {
    let trends = BlogViewService::trends(&state.pool, &state.schema, &q).await?;
    Ok(success_one("Blog view trends retrieved successfully", trends))
}

pub async fn top_posts(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<AnalyticsQuery>,
) -> Result<EnvelopeResponse<Vec<TopPost>>, AppError> {
    let top = BlogViewService::top_posts(&state.pool, &state.schema, &q).await?;
    Ok(success_one("Top blog posts retrieved successfully", top))
}
