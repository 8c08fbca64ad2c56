//! Filter criteria, sort order and page requests consumed by the SQL builder.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// A single predicate. Column names are checked against the entity when rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    In(String, Vec<Value>),
    /// Case-insensitive substring match on any of the columns.
    Contains { columns: Vec<String>, term: String },
    /// Row is linked through `link_table` to at least one of `ids`.
    LinkedToAny {
        link_table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
        ids: Vec<Uuid>,
    },
}

/// Conjunction of conditions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Criteria {
    pub conditions: Vec<Condition>,
}

impl Criteria {
    pub fn new() -> Self {
        Criteria::default()
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.push(Condition::Eq(column.to_string(), value.into()));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.push(Condition::Gte(column.to_string(), value.into()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.push(Condition::Lte(column.to_string(), value.into()));
        self
    }

    pub fn is_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.push(Condition::In(column.to_string(), values));
        self
    }

    pub fn contains(mut self, columns: &[&str], term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() && !columns.is_empty() {
            self.push(Condition::Contains {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                term: term.to_string(),
            });
        }
        self
    }

    pub fn linked_to_any(
        mut self,
        link_table: &'static str,
        owner_column: &'static str,
        target_column: &'static str,
        ids: Vec<Uuid>,
    ) -> Self {
        if !ids.is_empty() {
            self.push(Condition::LinkedToAny {
                link_table,
                owner_column,
                target_column,
                ids,
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Lenient parse: anything but `asc` (any case) is descending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SortOrder::parse(&s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub order: SortOrder,
}

impl OrderBy {
    pub fn new(column: &'static str, order: SortOrder) -> Self {
        OrderBy { column, order }
    }
}

/// Page number and size after clamping: limit in [1, 100], page >= 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = limit
            .unwrap_or(i64::from(Self::DEFAULT_LIMIT))
            .clamp(1, i64::from(Self::MAX_LIMIT)) as u32;
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        PageRequest { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(None, None)
    }
}

/// Parse a comma-separated id list such as `a,b, c`. Empty segments are skipped.
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("invalid id in list: {}", s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(-3), Some(500)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(2), Some(10)).offset(), 10);
        assert_eq!(PageRequest::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn sort_order_is_lenient() {
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }

    #[test]
    fn id_lists() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(parse_id_list(&format!("{}, {},", a, b)).unwrap(), vec![a, b]);
        assert!(parse_id_list("abc").is_err());
        assert!(parse_id_list("").unwrap().is_empty());
    }

    #[test]
    fn empty_keyword_adds_nothing() {
        assert!(Criteria::new().contains(&["title"], "   ").is_empty());
        assert!(Criteria::new().linked_to_any("job_skills", "job_id", "skill_id", vec![]).is_empty());
    }
}
