//! One nested router per entity. Each router carries its descriptor as an `Extension`,
//! so the generic handlers know which table they serve. Static segments (`slug`, `analytics`)
//! take priority over `:id`.

use crate::handlers::{blog_posts, blog_views, entity, jobs};
use crate::model::{entities, EntityDef, BLOG_POSTS, BLOG_VIEWS, JOBS};
use crate::state::AppState;
use axum::{extract::Extension, routing::get, Router};

fn crud_routes(entity_def: &'static EntityDef) -> Router<AppState> {
    let router = Router::new().route("/", get(entity::list).post(entity::create)).route(
        "/:id",
        get(entity::read)
            .put(entity::update)
            .patch(entity::update)
            .delete(entity::delete),
    );
    if entity_def.has_slug() {
        router.route("/slug/:slug", get(entity::read_by_slug))
    } else {
        router
    }
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list).post(jobs::create))
        .route("/slug/:slug", get(jobs::read_by_slug))
        .route(
            "/:id",
            get(jobs::read)
                .put(jobs::update)
                .patch(jobs::update)
                .delete(entity::delete),
        )
}

fn blog_post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog_posts::list).post(blog_posts::create))
        .route("/slug/:slug", get(entity::read_by_slug))
        .route(
            "/:id",
            get(entity::read)
                .put(blog_posts::update)
                .patch(blog_posts::update)
                .delete(entity::delete),
        )
}

fn blog_view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(entity::list).post(blog_views::record))
        .route("/analytics/overview", get(blog_views::overview))
        .route("/analytics/trends", get(blog_views::trends))
        .route("/analytics/top-posts", get(blog_views::top_posts))
        .route("/:id/stats", get(blog_views::post_stats))
        .route(
            "/:id",
            get(entity::read)
                .put(entity::update)
                .patch(entity::update)
                .delete(entity::delete),
        )
}

/// Router for one resource, to be nested at `/{path}`.
pub fn resource_router(entity_def: &'static EntityDef) -> Router<AppState> {
    let router = if std::ptr::eq(entity_def, &JOBS) {
        job_routes()
    } else if std::ptr::eq(entity_def, &BLOG_POSTS) {
        blog_post_routes()
    } else if std::ptr::eq(entity_def, &BLOG_VIEWS) {
        blog_view_routes()
    } else {
        crud_routes(entity_def)
    };
    router.layer(Extension(entity_def))
}

/// Every entity's routes, nested by path segment.
pub fn entity_routes(state: AppState) -> Router {
    entities()
        .iter()
        .fold(Router::new(), |router, e| {
            router.nest(&format!("/{}", e.path), resource_router(e))
        })
        .with_state(state)
}
