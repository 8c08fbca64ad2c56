//! Schema DDL generated from entity descriptors: schema, tables (with FKs, UNIQUE and CHECK constraints), indexes.
//! Tables are created parents first; every statement is idempotent except the optional reset.

use crate::error::AppError;
use crate::model::{entities, ColumnDef, EntityDef};
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn column_ddl(schema: &str, col: &ColumnDef) -> String {
    let mut def = format!("{} {}", quoted(col.name), col.ty.ddl());
    if col.name == "id" {
        def.push_str(" PRIMARY KEY");
    } else if !col.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(d) = col.default {
        def.push_str(" DEFAULT ");
        def.push_str(d);
    }
    if col.unique {
        def.push_str(" UNIQUE");
    }
    if let Some(fk) = col.references {
        def.push_str(&format!(
            " REFERENCES {} (\"id\") ON DELETE {}",
            qualified_table(schema, fk.table),
            fk.on_delete.as_sql()
        ));
    }
    if let Some(allowed) = col.rule.allowed {
        let values: Vec<String> = allowed.iter().map(|v| literal(v)).collect();
        def.push_str(&format!(" CHECK ({} IN ({}))", quoted(col.name), values.join(", ")));
    }
    def
}

/// CREATE TABLE IF NOT EXISTS for one entity.
pub fn table_ddl(schema: &str, entity: &EntityDef) -> String {
    let mut defs: Vec<String> = entity.columns().map(|c| column_ddl(schema, c)).collect();
    for group in entity.unique_together {
        let cols: Vec<String> = group.iter().map(|c| quoted(c)).collect();
        defs.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            quoted(&format!("uq_{}_{}", entity.table, group.join("_"))),
            cols.join(", ")
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(schema, entity.table),
        defs.join(",\n  ")
    )
}

pub fn index_ddl(schema: &str, entity: &EntityDef) -> Vec<String> {
    entity
        .indexes
        .iter()
        .map(|group| {
            let cols: Vec<String> = group.iter().map(|c| quoted(c)).collect();
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&format!("idx_{}_{}", entity.table, group.join("_"))),
                qualified_table(schema, entity.table),
                cols.join(", ")
            )
        })
        .collect()
}

/// Every statement needed to bring `schema` up, in execution order.
pub fn migration_statements(schema: &str, reset: bool) -> Vec<String> {
    let mut out = Vec::new();
    if reset {
        out.push(format!("DROP SCHEMA IF EXISTS {} CASCADE", quoted(schema)));
    }
    out.push(format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)));
    for entity in entities() {
        out.push(table_ddl(schema, entity));
    }
    for entity in entities() {
        out.extend(index_ddl(schema, entity));
    }
    out
}

/// Apply the schema in one transaction. With `reset`, the schema is dropped first and all data is lost.
pub async fn apply_migrations(pool: &PgPool, schema: &str, reset: bool) -> Result<(), AppError> {
    if reset {
        tracing::warn!(%schema, "DB_RESET set: dropping schema");
    }
    let statements = migration_statements(schema, reset);
    let mut tx = pool.begin().await?;
    for sql in &statements {
        tracing::debug!(%sql, "migration");
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(%schema, tables = entities().len(), "schema ready");
    Ok(())
}
