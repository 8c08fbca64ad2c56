//! Request validation from entity descriptors: column type checks plus per-column rules.

use crate::error::AppError;
use crate::model::{ColType, ColumnDef, EntityDef, FieldRule, Format, Record};
use chrono::DateTime;
use regex::Regex;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. All required fields must be present and non-null.
    pub fn validate(entity: &EntityDef, body: &Record) -> Result<(), AppError> {
        for col in entity.columns() {
            let val = body.get(col.name);
            if col.rule.required && val.map_or(true, Value::is_null) {
                return Err(AppError::Validation(format!("{} is required", col.name)));
            }
            if let Some(v) = val {
                validate_field(col, v)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PUT/PATCH). Required is not enforced for missing fields.
    pub fn validate_partial(entity: &EntityDef, body: &Record) -> Result<(), AppError> {
        for (name, v) in body {
            if let Some(col) = entity.column(name) {
                validate_field(col, v)?;
            }
        }
        Ok(())
    }
}

fn validate_field(col: &ColumnDef, v: &Value) -> Result<(), AppError> {
    if v.is_null() {
        if col.nullable {
            return Ok(());
        }
        return Err(AppError::Validation(format!("{} cannot be null", col.name)));
    }
    check_type(col, v)?;
    check_rule(col.name, v, &col.rule)
}

fn check_type(col: &ColumnDef, v: &Value) -> Result<(), AppError> {
    let ok = match col.ty {
        ColType::Uuid => v.as_str().map_or(false, |s| uuid::Uuid::parse_str(s).is_ok()),
        ColType::Text | ColType::Varchar(_) => v.is_string(),
        ColType::Int => v.as_i64().map_or(false, |n| i32::try_from(n).is_ok()),
        ColType::Numeric => v.is_number(),
        ColType::Bool => v.is_boolean(),
        ColType::Timestamptz => v.as_str().map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok()),
        ColType::TextArray => v.as_array().map_or(false, |a| a.iter().all(Value::is_string)),
    };
    if ok {
        return Ok(());
    }
    let expected = match col.ty {
        ColType::Uuid => "a UUID",
        ColType::Text | ColType::Varchar(_) => "a string",
        ColType::Int => "an integer",
        ColType::Numeric => "a number",
        ColType::Bool => "a boolean",
        ColType::Timestamptz => "an RFC 3339 timestamp",
        ColType::TextArray => "an array of strings",
    };
    Err(AppError::Validation(format!("{} must be {}", col.name, expected)))
}

fn check_rule(col: &str, v: &Value, rule: &FieldRule) -> Result<(), AppError> {
    if let Some(format) = rule.format {
        validate_format(col, v, format)?;
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
        if let Some(pattern) = rule.pattern {
            let re = Regex::new(pattern).map_err(|_| AppError::Internal(format!("invalid pattern for {}", col)))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
        if let Some(allowed) = rule.allowed {
            if !allowed.contains(&s) {
                return Err(AppError::Validation(format!(
                    "{} must be one of: {}",
                    col,
                    allowed.join(", ")
                )));
            }
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    Ok(())
}

fn validate_format(col: &str, v: &Value, format: Format) -> Result<(), AppError> {
    let Some(s) = v.as_str() else {
        return Ok(());
    };
    match format {
        Format::Email => {
            let valid = match s.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
                }
                None => false,
            };
            if !valid {
                return Err(AppError::Validation(format!("{} must be a valid email", col)));
            }
        }
        Format::Url => {
            let rest = s.strip_prefix("https://").or_else(|| s.strip_prefix("http://"));
            if rest.map_or(true, |r| r.is_empty() || r.starts_with('/')) {
                return Err(AppError::Validation(format!("{} must be an http(s) URL", col)));
            }
        }
    }
    Ok(())
}
