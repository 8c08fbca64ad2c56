//! Connection pool setup and database bootstrap.

use crate::error::{AppError, ConfigError};
use crate::settings::Settings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Open the shared pool. The statement timeout is applied to every connection as a server option.
pub async fn connect(settings: &Settings) -> Result<PgPool, AppError> {
    let options = PgConnectOptions::from_str(&settings.database_url)
        .map_err(invalid_url)?
        .options([(
            "statement_timeout",
            format!("{}", settings.db_statement_timeout.as_millis()),
        )]);
    let pool = PgPoolOptions::new()
        .min_connections(settings.db_min_connections)
        .max_connections(settings.db_max_connections)
        .acquire_timeout(settings.db_acquire_timeout)
        .connect_with(options);
    let pool = tokio::time::timeout(settings.db_connect_timeout, pool)
        .await
        .map_err(|_| AppError::Db(sqlx::Error::PoolTimedOut))??;
    tracing::info!(
        min = settings.db_min_connections,
        max = settings.db_max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Create the target database when it does not exist, connecting through the `postgres` database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(invalid_url)?;
    let mut conn = opts.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", crate::sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

fn invalid_url(e: impl std::fmt::Display) -> AppError {
    AppError::Config(ConfigError::InvalidValue {
        key: "DATABASE_URL",
        reason: e.to_string(),
    })
}

/// Split `postgres://host/db?x=y` into (`postgres://host/postgres?x=y`, `db`).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| invalid_url("no database path"))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((db, q)) => (db.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_keeps_host_and_query() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@db:5432/jobboard?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@db:5432/postgres?sslmode=disable");
        assert_eq!(db, "jobboard");
        let (admin, db) = parse_db_name_from_url("postgres://localhost/jobs").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(db, "jobs");
    }
}
