//! Decode result rows into JSON objects using the entity's column types.

use crate::model::{ColType, ColumnDef, EntityDef};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

pub fn row_to_json(entity: &EntityDef, row: &PgRow) -> Result<Value, sqlx::Error> {
    let mut map = Map::new();
    for col in entity.visible_columns() {
        map.insert(col.name.to_string(), cell_to_value(row, col)?);
    }
    Ok(Value::Object(map))
}

fn cell_to_value(row: &PgRow, col: &ColumnDef) -> Result<Value, sqlx::Error> {
    let name = col.name;
    let v = match col.ty {
        ColType::Uuid => row
            .try_get::<Option<Uuid>, _>(name)?
            .map(|u| Value::String(u.to_string())),
        ColType::Text | ColType::Varchar(_) => row.try_get::<Option<String>, _>(name)?.map(Value::String),
        ColType::Int => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
        ColType::Numeric => row
            .try_get::<Option<f64>, _>(name)?
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        ColType::Bool => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
        ColType::Timestamptz => row
            .try_get::<Option<DateTime<Utc>>, _>(name)?
            .map(|d| Value::String(d.to_rfc3339())),
        ColType::TextArray => row
            .try_get::<Option<Vec<String>>, _>(name)?
            .map(|v| Value::Array(v.into_iter().map(Value::String).collect())),
    };
    Ok(v.unwrap_or(Value::Null))
}
