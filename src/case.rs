//! Key normalization for requests: camelCase / PascalCase / kebab-case -> snake_case column names.

use crate::model::Record;

/// Convert one identifier to snake_case.
/// e.g. "companyId" -> "company_id", "CompanyId" -> "company_id", "userID" -> "user_id"
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map(|n| n.is_lowercase()).unwrap_or(false),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Rewrite all top-level keys of a request body to snake_case. Later keys win on collision.
pub fn record_keys_to_snake_case(record: Record) -> Record {
    record
        .into_iter()
        .map(|(k, v)| (to_snake_case(&k), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_case_variants() {
        assert_eq!(to_snake_case("title"), "title");
        assert_eq!(to_snake_case("Title"), "title");
        assert_eq!(to_snake_case("companyId"), "company_id");
        assert_eq!(to_snake_case("CompanyId"), "company_id");
        assert_eq!(to_snake_case("JobType"), "job_type");
        assert_eq!(to_snake_case("userID"), "user_id");
        assert_eq!(to_snake_case("HTTPStatus"), "http_status");
        assert_eq!(to_snake_case("views_count"), "views_count");
        assert_eq!(to_snake_case("sort-order"), "sort_order");
    }

    #[test]
    fn record_keys_are_rewritten() {
        let body = json!({"Title": "Backend Engineer", "CompanyId": "x", "salary_min": 10});
        let Some(map) = body.as_object().cloned() else { panic!("object") };
        let out = record_keys_to_snake_case(map);
        assert!(out.contains_key("title"));
        assert!(out.contains_key("company_id"));
        assert!(out.contains_key("salary_min"));
    }
}
