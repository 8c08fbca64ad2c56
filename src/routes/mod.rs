mod common;
mod entity;

pub use common::common_routes;
pub use entity::{entity_routes, resource_router};

use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

async fn route_not_found() -> AppError {
    AppError::NotFound("route".into())
}

/// Full application: operational routes at the root, the API under `/api`.
pub fn app_router(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", entity_routes(state))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
