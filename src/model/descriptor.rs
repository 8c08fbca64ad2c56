//! Static entity descriptors: table, typed columns, constraints and per-column request rules.
//! Repositories, the SQL builder, migrations and request validation are all driven from these.

use crate::case::to_snake_case;

/// Column storage type. Drives DDL, parameter casts and row decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColType {
    Uuid,
    Text,
    Varchar(u32),
    Int,
    /// NUMERIC(12,2); read back as float8.
    Numeric,
    Bool,
    Timestamptz,
    TextArray,
}

impl ColType {
    pub fn ddl(&self) -> String {
        match self {
            ColType::Uuid => "UUID".into(),
            ColType::Text => "TEXT".into(),
            ColType::Varchar(n) => format!("VARCHAR({})", n),
            ColType::Int => "INTEGER".into(),
            ColType::Numeric => "NUMERIC(12, 2)".into(),
            ColType::Bool => "BOOLEAN".into(),
            ColType::Timestamptz => "TIMESTAMPTZ".into(),
            ColType::TextArray => "TEXT[]".into(),
        }
    }

    /// Type used for `$n::<cast>` on bound parameters.
    pub fn cast(&self) -> &'static str {
        match self {
            ColType::Uuid => "uuid",
            ColType::Text | ColType::Varchar(_) => "text",
            ColType::Int => "int4",
            ColType::Numeric => "numeric",
            ColType::Bool => "boolean",
            ColType::Timestamptz => "timestamptz",
            ColType::TextArray => "text[]",
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, ColType::Text | ColType::Varchar(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    Url,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
        }
    }
}

/// Foreign key to another entity's `id`.
#[derive(Clone, Copy, Debug)]
pub struct ForeignKey {
    pub table: &'static str,
    pub on_delete: OnDelete,
}

/// Request-level rules for one column.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub required: bool,
    pub format: Option<Format>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<&'static str>,
    pub allowed: Option<&'static [&'static str]>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldRule {
    pub const NONE: FieldRule = FieldRule {
        required: false,
        format: None,
        min_length: None,
        max_length: None,
        pattern: None,
        allowed: None,
        minimum: None,
        maximum: None,
    };
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColType,
    pub nullable: bool,
    /// SQL default expression.
    pub default: Option<&'static str>,
    pub unique: bool,
    pub references: Option<ForeignKey>,
    /// Never selected or returned.
    pub sensitive: bool,
    /// Not assignable through the API.
    pub read_only: bool,
    pub rule: FieldRule,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColType) -> Self {
        ColumnDef {
            name,
            ty,
            nullable: true,
            default: None,
            unique: false,
            references: None,
            sensitive: false,
            read_only: false,
            rule: FieldRule::NONE,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColType::Text)
    }

    pub const fn varchar(name: &'static str, len: u32) -> Self {
        Self::new(name, ColType::Varchar(len)).max_length(len)
    }

    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self::new(name, ColType::Bool)
            .not_null()
            .default(if default { "TRUE" } else { "FALSE" })
    }

    pub const fn foreign(name: &'static str, table: &'static str, on_delete: OnDelete) -> Self {
        let mut c = Self::new(name, ColType::Uuid);
        c.references = Some(ForeignKey { table, on_delete });
        c
    }

    /// NOT NULL and required on create.
    pub const fn required(mut self) -> Self {
        self.nullable = false;
        self.rule.required = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn default(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self.read_only = true;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.rule.format = Some(format);
        self
    }

    pub const fn min_length(mut self, n: u32) -> Self {
        self.rule.min_length = Some(n);
        self
    }

    pub const fn max_length(mut self, n: u32) -> Self {
        self.rule.max_length = Some(n);
        self
    }

    pub const fn pattern(mut self, pattern: &'static str) -> Self {
        self.rule.pattern = Some(pattern);
        self
    }

    pub const fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.rule.allowed = Some(values);
        self
    }

    pub const fn minimum(mut self, n: f64) -> Self {
        self.rule.minimum = Some(n);
        self
    }

    pub const fn maximum(mut self, n: f64) -> Self {
        self.rule.maximum = Some(n);
        self
    }

    pub fn is_writable(&self) -> bool {
        !self.read_only && !self.sensitive
    }
}

/// Columns every entity carries ahead of its own fields.
pub static AUDIT_COLUMNS: [ColumnDef; 3] = [
    ColumnDef::new("id", ColType::Uuid)
        .not_null()
        .default("gen_random_uuid()")
        .read_only(),
    ColumnDef::new("created_at", ColType::Timestamptz)
        .not_null()
        .default("NOW()")
        .read_only(),
    ColumnDef::new("updated_at", ColType::Timestamptz)
        .not_null()
        .default("NOW()")
        .read_only(),
];

pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

#[derive(Debug)]
pub struct EntityDef {
    pub table: &'static str,
    /// URL path segment, e.g. `job-tags`.
    pub path: &'static str,
    pub label: &'static str,
    pub plural: &'static str,
    pub fields: &'static [ColumnDef],
    pub unique_together: &'static [&'static [&'static str]],
    pub indexes: &'static [&'static [&'static str]],
    /// Allow-list for `sortBy`.
    pub sort_fields: &'static [&'static str],
    pub default_sort: &'static str,
    /// Columns matched by `keyword`.
    pub search_columns: &'static [&'static str],
    /// Column a missing slug is derived from.
    pub slug_source: Option<&'static str>,
}

impl EntityDef {
    pub fn columns(&self) -> impl Iterator<Item = &'static ColumnDef> {
        let fields: &'static [ColumnDef] = self.fields;
        AUDIT_COLUMNS.iter().chain(fields.iter())
    }

    /// Columns that may appear in responses.
    pub fn visible_columns(&self) -> impl Iterator<Item = &'static ColumnDef> {
        self.columns().filter(|c| !c.sensitive)
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn has_slug(&self) -> bool {
        self.has_column("slug")
    }

    /// Maps a requested sort field (any case style) through the allow-list; falls back to the default.
    pub fn resolve_sort(&self, requested: Option<&str>) -> &'static str {
        let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
            return self.default_sort;
        };
        let snake = to_snake_case(requested);
        self.sort_fields
            .iter()
            .copied()
            .find(|f| *f == snake)
            .unwrap_or(self.default_sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static WIDGETS: EntityDef = EntityDef {
        table: "widgets",
        path: "widgets",
        label: "Widget",
        plural: "Widgets",
        fields: &[
            ColumnDef::varchar("name", 100).required(),
            ColumnDef::varchar("slug", 120).unique(),
            ColumnDef::new("secret", ColType::Text).sensitive(),
        ],
        unique_together: &[],
        indexes: &[],
        sort_fields: &["created_at", "name"],
        default_sort: "created_at",
        search_columns: &["name"],
        slug_source: Some("name"),
    };

    #[test]
    fn audit_columns_come_first() {
        let names: Vec<_> = WIDGETS.columns().map(|c| c.name).collect();
        assert_eq!(names, ["id", "created_at", "updated_at", "name", "slug", "secret"]);
    }

    #[test]
    fn sensitive_columns_are_hidden() {
        assert!(WIDGETS.visible_columns().all(|c| c.name != "secret"));
        assert!(!WIDGETS.column("secret").unwrap().is_writable());
    }

    #[test]
    fn sort_goes_through_allow_list() {
        assert_eq!(WIDGETS.resolve_sort(Some("name")), "name");
        assert_eq!(WIDGETS.resolve_sort(Some("createdAt")), "created_at");
        assert_eq!(WIDGETS.resolve_sort(Some("secret; DROP TABLE")), "created_at");
        assert_eq!(WIDGETS.resolve_sort(None), "created_at");
    }

    #[test]
    fn varchar_carries_max_length() {
        assert_eq!(WIDGETS.column("name").unwrap().rule.max_length, Some(100));
        assert!(WIDGETS.column("name").unwrap().rule.required);
        assert!(!WIDGETS.column("name").unwrap().nullable);
    }
}
