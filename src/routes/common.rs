//! Operational routes: health, readiness, version.

use crate::response::{success_one, Envelope, EnvelopeResponse};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionBody {
    name: &'static str,
    version: &'static str,
}

async fn health() -> EnvelopeResponse<HealthBody> {
    success_one("Service is healthy", HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> EnvelopeResponse<ReadyBody> {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.pool).await {
        tracing::warn!(error = %e, "readiness check failed");
        let mut envelope = Envelope::error("Database unavailable");
        envelope.data = Some(ReadyBody {
            status: "degraded",
            database: "unavailable",
        });
        return (StatusCode::SERVICE_UNAVAILABLE, Json(envelope));
    }
    success_one(
        "Service is ready",
        ReadyBody {
            status: "ok",
            database: "ok",
        },
    )
}

async fn version() -> EnvelopeResponse<VersionBody> {
    success_one(
        "Version retrieved successfully",
        VersionBody {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// GET /health, GET /ready (with DB check), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
