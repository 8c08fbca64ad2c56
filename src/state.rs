//! Shared application state for all routes.

use crate::model::EntityDef;
use crate::repository::Repository;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Schema holding every job-board table.
    pub schema: Arc<str>,
}

impl AppState {
    pub fn new(pool: PgPool, schema: impl Into<Arc<str>>) -> Self {
        AppState {
            pool,
            schema: schema.into(),
        }
    }

    pub fn repo(&self, entity: &'static EntityDef) -> Repository<'_> {
        Repository::new(&self.pool, &self.schema, entity)
    }
}
