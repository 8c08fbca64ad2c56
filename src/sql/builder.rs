//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from entity descriptors.
//! Identifiers come from descriptors only; every value is a bound, cast parameter.

use super::criteria::{Condition, Criteria, OrderBy};
use super::params::PgBindValue;
use crate::model::{ColType, ColumnDef, EntityDef, Record};
use serde_json::Value;
use uuid::Uuid;

/// Alias of the entity's table in SELECTs.
pub const MAIN_ALIAS: &str = "main";
/// Window-count column added by paginated selects.
pub const TOTAL_COLUMN: &str = "__total";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Push a value for `col` and return its cast placeholder.
    fn placeholder(&mut self, col: &ColumnDef, v: &Value) -> String {
        let n = self.push_param(PgBindValue::for_column(v, col.ty));
        format!("${}::{}", n, col.ty.cast())
    }
}

fn column_expr(col: &ColumnDef, alias: Option<&str>) -> String {
    let q = quoted(col.name);
    let reference = match alias {
        Some(a) => format!("{}.{}", a, q),
        None => q.clone(),
    };
    match col.ty {
        ColType::Numeric => format!("{}::float8 AS {}", reference, q),
        _ if alias.is_some() => format!("{} AS {}", reference, q),
        _ => reference,
    }
}

/// SELECT list of visible columns. Numeric columns come back as float8.
pub fn select_column_list(entity: &EntityDef, alias: Option<&str>) -> String {
    entity
        .visible_columns()
        .map(|c| column_expr(c, alias))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn render_condition(q: &mut QueryBuf, entity: &EntityDef, schema: &str, cond: &Condition) -> Option<String> {
    let col_ref = |c: &ColumnDef| format!("{}.{}", MAIN_ALIAS, quoted(c.name));
    match cond {
        Condition::Eq(name, v) => {
            let col = entity.column(name).filter(|c| !c.sensitive)?;
            if v.is_null() {
                return Some(format!("{} IS NULL", col_ref(col)));
            }
            let ph = q.placeholder(col, v);
            Some(format!("{} = {}", col_ref(col), ph))
        }
        Condition::Gte(name, v) | Condition::Lte(name, v) => {
            let col = entity.column(name).filter(|c| !c.sensitive)?;
            let op = if matches!(cond, Condition::Gte(..)) { ">=" } else { "<=" };
            let ph = q.placeholder(col, v);
            Some(format!("{} {} {}", col_ref(col), op, ph))
        }
        Condition::In(name, values) => {
            let col = entity.column(name).filter(|c| !c.sensitive)?;
            if values.is_empty() {
                return Some("FALSE".into());
            }
            let phs: Vec<String> = values.iter().map(|v| q.placeholder(col, v)).collect();
            Some(format!("{} IN ({})", col_ref(col), phs.join(", ")))
        }
        Condition::Contains { columns, term } => {
            let cols: Vec<&ColumnDef> = columns
                .iter()
                .filter_map(|name| entity.column(name))
                .filter(|c| c.ty.is_textual() && !c.sensitive)
                .collect();
            if cols.is_empty() {
                return None;
            }
            let n = q.push_param(PgBindValue::text(format!("%{}%", escape_like(term))));
            let parts: Vec<String> = cols.iter().map(|c| format!("{} ILIKE ${}", col_ref(c), n)).collect();
            Some(format!("({})", parts.join(" OR ")))
        }
        Condition::LinkedToAny {
            link_table,
            owner_column,
            target_column,
            ids,
        } => {
            if ids.is_empty() {
                return None;
            }
            let phs: Vec<String> = ids
                .iter()
                .map(|id| format!("${}::uuid", q.push_param(PgBindValue::Uuid(*id))))
                .collect();
            Some(format!(
                "EXISTS (SELECT 1 FROM {} l WHERE l.{} = {}.\"id\" AND l.{} IN ({}))",
                qualified_table(schema, link_table),
                quoted(owner_column),
                MAIN_ALIAS,
                quoted(target_column),
                phs.join(", ")
            ))
        }
    }
}

fn where_clause(q: &mut QueryBuf, entity: &EntityDef, schema: &str, criteria: &Criteria) -> String {
    let parts: Vec<String> = criteria
        .conditions
        .iter()
        .filter_map(|c| render_condition(q, entity, schema, c))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

fn order_clause(entity: &EntityDef, order: Option<&OrderBy>) -> String {
    let (column, dir) = match order {
        Some(o) if entity.has_column(o.column) => (o.column, o.order.as_sql()),
        Some(o) => (entity.default_sort, o.order.as_sql()),
        None => (entity.default_sort, "DESC"),
    };
    // id breaks ties so pages stay stable
    format!(
        " ORDER BY {a}.{} {d}, {a}.\"id\" {d}",
        quoted(column),
        a = MAIN_ALIAS,
        d = dir
    )
}

/// SELECT rows matching criteria, ordered, with optional LIMIT/OFFSET.
/// With `with_total`, each row also carries `COUNT(*) OVER()` as [`TOTAL_COLUMN`].
pub fn select_list(
    entity: &EntityDef,
    schema: &str,
    criteria: &Criteria,
    order: Option<&OrderBy>,
    limit: Option<u32>,
    offset: Option<u64>,
    with_total: bool,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, entity.table);
    let where_sql = where_clause(&mut q, entity, schema, criteria);
    let mut cols = select_column_list(entity, Some(MAIN_ALIAS));
    if with_total {
        cols.push_str(&format!(", COUNT(*) OVER() AS {}", quoted(TOTAL_COLUMN)));
    }
    let limit_sql = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_sql = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {} {}{}{}{}{}",
        cols,
        table,
        MAIN_ALIAS,
        where_sql,
        order_clause(entity, order),
        limit_sql,
        offset_sql
    );
    q
}

pub fn select_by_id(entity: &EntityDef, schema: &str, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Uuid(id));
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.\"id\" = ${}::uuid",
        select_column_list(entity, Some(MAIN_ALIAS)),
        qualified_table(schema, entity.table),
        MAIN_ALIAS,
        MAIN_ALIAS,
        n
    );
    q
}

pub fn select_count(entity: &EntityDef, schema: &str, criteria: &Criteria) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, entity, schema, criteria);
    q.sql = format!(
        "SELECT COUNT(*) FROM {} {}{}",
        qualified_table(schema, entity.table),
        MAIN_ALIAS,
        where_sql
    );
    q
}

pub fn select_exists(entity: &EntityDef, schema: &str, criteria: &Criteria) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, entity, schema, criteria);
    q.sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} {}{})",
        qualified_table(schema, entity.table),
        MAIN_ALIAS,
        where_sql
    );
    q
}

/// INSERT writable columns present in body; omitted columns take their DB default.
/// With `skip_conflicts`, a unique violation inserts nothing and returns no row.
pub fn insert(entity: &EntityDef, schema: &str, body: &Record, skip_conflicts: bool) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, entity.table);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.columns() {
        let Some(val) = body.get(c.name) else { continue };
        if !insertable(c) {
            continue;
        }
        placeholders.push(q.placeholder(c, val));
        cols.push(quoted(c.name));
    }
    let values_sql = if cols.is_empty() {
        " DEFAULT VALUES".to_string()
    } else {
        format!(" ({}) VALUES ({})", cols.join(", "), placeholders.join(", "))
    };
    let conflict_sql = if skip_conflicts { " ON CONFLICT DO NOTHING" } else { "" };
    q.sql = format!(
        "INSERT INTO {}{}{} RETURNING {}",
        table,
        values_sql,
        conflict_sql,
        select_column_list(entity, None)
    );
    q
}

// Services may set the password hash; clients cannot.
fn insertable(c: &ColumnDef) -> bool {
    c.is_writable() || (c.sensitive && c.name != "id")
}

/// UPDATE by id: SET writable columns present in body and bump `updated_at`.
pub fn update(entity: &EntityDef, schema: &str, id: Uuid, body: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in entity.columns() {
        let Some(val) = body.get(c.name) else { continue };
        if !insertable(c) {
            continue;
        }
        let ph = q.placeholder(c, val);
        sets.push(format!("{} = {}", quoted(c.name), ph));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let n = q.push_param(PgBindValue::Uuid(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ${}::uuid RETURNING {}",
        qualified_table(schema, entity.table),
        sets.join(", "),
        n,
        select_column_list(entity, None)
    );
    q
}

/// DELETE by id, returning the id when a row was removed.
pub fn delete(entity: &EntityDef, schema: &str, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Uuid(id));
    q.sql = format!(
        "DELETE FROM {} WHERE \"id\" = ${}::uuid RETURNING \"id\"",
        qualified_table(schema, entity.table),
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BLOG_POSTS, JOBS, USERS};
    use crate::sql::criteria::SortOrder;
    use serde_json::json;

    #[test]
    fn list_with_filters_sort_and_page() {
        let criteria = Criteria::new()
            .eq("status", "Active")
            .gte("salary_min", 50000)
            .lte("salary_max", 90000)
            .contains(&["title", "description"], "engineer");
        let order = OrderBy::new("salary_min", SortOrder::Asc);
        let q = select_list(&JOBS, "jobboard", &criteria, Some(&order), Some(10), Some(10), true);
        assert!(q.sql.starts_with("SELECT main.\"id\" AS \"id\""));
        assert!(q.sql.contains("FROM \"jobboard\".\"jobs\" main WHERE"));
        assert!(q.sql.contains("main.\"status\" = $1::text"));
        assert!(q.sql.contains("main.\"salary_min\" >= $2::numeric"));
        assert!(q.sql.contains("main.\"salary_max\" <= $3::numeric"));
        assert!(q.sql.contains("(main.\"title\" ILIKE $4 OR main.\"description\" ILIKE $4)"));
        assert!(q.sql.contains("COUNT(*) OVER() AS \"__total\""));
        assert!(q.sql.contains("main.\"salary_min\"::float8 AS \"salary_min\""));
        assert!(q.sql.ends_with("ORDER BY main.\"salary_min\" ASC, main.\"id\" ASC LIMIT 10 OFFSET 10"));
        assert_eq!(q.params.len(), 4);
        assert_eq!(q.params[3], PgBindValue::Text("%engineer%".into()));
    }

    #[test]
    fn unknown_and_sensitive_columns_are_ignored() {
        let criteria = Criteria::new().eq("bogus", 1).eq("password_hash", "x");
        let q = select_list(&USERS, "s", &criteria, None, None, None, false);
        assert!(!q.sql.contains("WHERE"));
        assert!(!q.sql.contains("password_hash"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn keyword_metacharacters_are_escaped() {
        let criteria = Criteria::new().contains(&["title"], "100%_off");
        let q = select_count(&BLOG_POSTS, "s", &criteria);
        assert_eq!(q.params, vec![PgBindValue::Text("%100\\%\\_off%".into())]);
        assert!(q.sql.starts_with("SELECT COUNT(*) FROM \"s\".\"blog_posts\" main WHERE"));
    }

    #[test]
    fn linked_to_any_renders_exists() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let criteria = Criteria::new().linked_to_any("job_skills", "job_id", "skill_id", ids.clone());
        let q = select_count(&JOBS, "s", &criteria);
        assert!(q.sql.contains(
            "EXISTS (SELECT 1 FROM \"s\".\"job_skills\" l WHERE l.\"job_id\" = main.\"id\" AND l.\"skill_id\" IN ($1::uuid, $2::uuid))"
        ));
        assert_eq!(q.params, ids.into_iter().map(PgBindValue::Uuid).collect::<Vec<_>>());
    }

    #[test]
    fn insert_skips_read_only_and_unknown_keys() {
        let mut body = Record::new();
        body.insert("title".into(), json!("Backend Engineer"));
        body.insert("views_count".into(), json!(99));
        body.insert("id".into(), json!(Uuid::new_v4().to_string()));
        body.insert("nonsense".into(), json!(true));
        let q = insert(&JOBS, "s", &body, false);
        assert!(q.sql.starts_with("INSERT INTO \"s\".\"jobs\" (\"title\") VALUES ($1::text) RETURNING \"id\""));
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn insert_can_skip_conflicts() {
        let mut body = Record::new();
        body.insert("name".into(), json!("admin"));
        let q = insert(&crate::model::ROLES, "s", &body, true);
        assert!(q.sql.contains("ON CONFLICT DO NOTHING RETURNING"));
    }

    #[test]
    fn update_bumps_updated_at_and_binds_id_last() {
        let id = Uuid::new_v4();
        let mut body = Record::new();
        body.insert("status".into(), json!("Closed"));
        let q = update(&JOBS, "s", id, &body);
        assert!(q.sql.contains("SET \"status\" = $1::text, \"updated_at\" = NOW() WHERE \"id\" = $2::uuid"));
        assert_eq!(q.params.last(), Some(&PgBindValue::Uuid(id)));
    }

    #[test]
    fn delete_returns_id() {
        let q = delete(&JOBS, "s", Uuid::nil());
        assert_eq!(q.sql, "DELETE FROM \"s\".\"jobs\" WHERE \"id\" = $1::uuid RETURNING \"id\"");
    }

    #[test]
    fn in_with_no_values_matches_nothing() {
        let q = select_count(&JOBS, "s", &Criteria::new().is_in("status", vec![]));
        assert!(q.sql.ends_with("WHERE FALSE"));
    }
}
