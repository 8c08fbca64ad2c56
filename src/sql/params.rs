//! Convert serde_json::Value to types that sqlx can bind, guided by the target column type.

use crate::model::ColType;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};
use uuid::Uuid;

/// A value that can be bound to a PostgreSQL query.
///
/// Prepared statements are cached per SQL text, so the declared type of each parameter must
/// depend only on the column it targets, never on the value. Scalar column values are sent
/// as text (nulls included) and converted by the `$n::<type>` cast; array columns as `text[]`.
/// `Uuid` is only used for positions the builder always fills with an id.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Text(String),
    TextArray(Option<Vec<String>>),
    Uuid(Uuid),
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl PgBindValue {
    pub fn for_column(v: &Value, ty: ColType) -> Self {
        match (ty, v) {
            (ColType::TextArray, Value::Null) => PgBindValue::TextArray(None),
            (ColType::TextArray, Value::Array(items)) => {
                PgBindValue::TextArray(Some(items.iter().map(scalar_text).collect()))
            }
            (ColType::TextArray, other) => PgBindValue::TextArray(Some(vec![scalar_text(other)])),
            (_, Value::Null) => PgBindValue::Null,
            (_, v) => PgBindValue::Text(scalar_text(v)),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        PgBindValue::Text(s.into())
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf),
            PgBindValue::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf),
            PgBindValue::TextArray(v) => <Option<Vec<String>> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Uuid(u) => <Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <Uuid as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}
