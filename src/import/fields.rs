use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    /// Non-negative whole number.
    Integer,
    /// Non-negative decimal amount.
    Decimal,
    Boolean,
    /// ISO 8601 calendar date.
    Date,
    /// UUID of another record in the same tenant.
    Reference,
    /// One of a fixed set of lowercase values.
    Choice(&'static [&'static str]),
}

/// A declared, importable field of an entity.
#[derive(Debug)]
pub struct FieldDef {
    /// API (camelCase) name.
    pub name: &'static str,
    /// Database column.
    pub column: &'static str,
    /// Human-readable label, also accepted as a CSV header.
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDef {
    pub const fn new(
        name: &'static str,
        column: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            column,
            label,
            kind,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Coerce a raw cell (CSV string or JSON scalar) into the JSON shape the
/// entity input expects. Empty cells become `null`.
pub fn coerce(cell: &Value, kind: FieldKind) -> Result<Value, String> {
    let text = match cell {
        Value::Null => return Ok(Value::Null),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => {
            return Err("nested values are not supported".to_string());
        }
    };

    if text.is_empty() {
        return Ok(Value::Null);
    }

    match kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Url => Ok(Value::String(text)),
        FieldKind::Integer => text
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| format!("expected a whole number, got '{text}'")),
        FieldKind::Decimal => Decimal::from_str(&text)
            .map(|d| Value::String(d.normalize().to_string()))
            .map_err(|_| format!("expected a decimal amount, got '{text}'")),
        FieldKind::Boolean => parse_bool(&text)
            .map(Value::Bool)
            .ok_or_else(|| format!("expected true/false, got '{text}'")),
        FieldKind::Date => parse_date(&text)
            .map(|d| Value::String(d.to_string()))
            .ok_or_else(|| format!("expected a YYYY-MM-DD date, got '{text}'")),
        FieldKind::Reference => Uuid::parse_str(&text)
            .map(|id| Value::String(id.to_string()))
            .map_err(|_| format!("expected a record id, got '{text}'")),
        FieldKind::Choice(options) => {
            let lowered = text.to_lowercase();
            options
                .iter()
                .find(|o| **o == lowered)
                .map(|o| Value::String(o.to_string()))
                .ok_or_else(|| format!("expected one of {}, got '{text}'", options.join(", ")))
        }
    }
}

/// Money columns are NUMERIC(12, 2).
const MAX_AMOUNT_SCALE: u32 = 2;
const AMOUNT_LIMIT: i64 = 10_000_000_000;

fn amount_error(label: &str, amount: Decimal) -> Option<String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        Some(format!("{label} must not be negative"))
    } else if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        Some(format!("{label} must have at most {MAX_AMOUNT_SCALE} decimal places"))
    } else if amount >= Decimal::from(AMOUNT_LIMIT) {
        Some(format!("{label} must be less than {AMOUNT_LIMIT}"))
    } else {
        None
    }
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Replace blank optional strings with `null` so they are stored as absent.
/// Required fields keep their blank value for `validate` to reject.
pub fn clear_blanks(obj: &mut Map<String, Value>, fields: &[FieldDef]) {
    for def in fields.iter().filter(|d| !d.required) {
        if let Some(value) = obj.get_mut(def.name) {
            if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                *value = Value::Null;
            }
        }
    }
}

/// Validate a serialized entity input against its declared fields.
/// Required fields are only enforced when `creating`; on update an absent
/// field keeps its stored value.
pub fn validate(input: &Value, fields: &[FieldDef], creating: bool) -> Vec<String> {
    let mut errors = Vec::new();
    let empty = Map::new();
    let obj = input.as_object().unwrap_or(&empty);

    for def in fields {
        match obj.get(def.name) {
            None | Some(Value::Null) => {
                if def.required && creating {
                    errors.push(format!("{} is required", def.label));
                }
            }
            Some(Value::String(s)) => {
                if s.trim().is_empty() {
                    if def.required {
                        errors.push(format!("{} is required", def.label));
                    }
                    continue;
                }
                match def.kind {
                    FieldKind::Email if !EMAIL_REGEX.is_match(s) => {
                        errors.push(format!("{} must be a valid email address", def.label));
                    }
                    FieldKind::Url if !(s.starts_with("http://") || s.starts_with("https://")) => {
                        errors.push(format!("{} must be an http(s) URL", def.label));
                    }
                    FieldKind::Choice(options) if !options.contains(&s.as_str()) => {
                        errors.push(format!(
                            "{} must be one of {}",
                            def.label,
                            options.join(", ")
                        ));
                    }
                    FieldKind::Decimal => {
                        if let Some(message) = Decimal::from_str(s)
                            .ok()
                            .and_then(|d| amount_error(def.label, d))
                        {
                            errors.push(message);
                        }
                    }
                    _ => {}
                }
            }
            Some(Value::Number(n)) => match def.kind {
                FieldKind::Integer if n.as_i64().is_some_and(|v| v < 0) => {
                    errors.push(format!("{} must not be negative", def.label));
                }
                FieldKind::Decimal => {
                    if let Some(message) = Decimal::from_str(&n.to_string())
                        .ok()
                        .and_then(|d| amount_error(def.label, d))
                    {
                        errors.push(message);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    errors
}
