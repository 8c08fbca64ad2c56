//! Job board REST backend: descriptor-driven CRUD over PostgreSQL with filtered job and blog
//! listings and blog view analytics.

pub mod case;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod repository;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;

pub use db::{connect, ensure_database_exists};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use response::{Envelope, Meta};
pub use routes::{app_router, common_routes, entity_routes};
pub use seed::seed_reference_data;
pub use settings::Settings;
pub use state::AppState;
