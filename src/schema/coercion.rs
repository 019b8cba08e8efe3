//! Value coercion against declared column types.

use chrono::{DateTime, NaiveDate, Utc};

use crate::ast::Value;
use crate::schema::FieldType;

/// Coerces a comparison value to what the declared type expects.
/// Returning [`Value::Null`] means the comparison carries no constraint.
pub trait TypeCoercion {
    fn coerce(&self, typ: FieldType, value: Value) -> Value;
}

/// Numbers against date/timestamp columns are epoch milliseconds; strings are
/// RFC 3339 or `YYYY-MM-DD`. Booleans, enum constants and arrays mean nothing
/// there and become null. Other column types pass values through.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochMillis;

impl TypeCoercion for EpochMillis {
    fn coerce(&self, typ: FieldType, value: Value) -> Value {
        if !typ.is_temporal() {
            return value;
        }
        match value {
            Value::Int(ms) => from_millis(ms),
            Value::Float(ms) if ms.is_finite() => from_millis(ms as i64),
            Value::Float(_) => Value::Null,
            Value::String(s) => parse_date(&s),
            Value::Date(d) => Value::Date(d),
            Value::Null | Value::Bool(_) | Value::Enum { .. } | Value::Array(_) => Value::Null,
        }
    }
}

fn from_millis(ms: i64) -> Value {
    DateTime::<Utc>::from_timestamp_millis(ms).map_or(Value::Null, Value::Date)
}

fn parse_date(s: &str) -> Value {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Value::Date(d.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(Value::Null, |dt| Value::Date(dt.and_utc()))
}
