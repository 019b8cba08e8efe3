use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value carried by a condition node.
///
/// The JSON form is untagged: `null`, booleans, numbers, strings and arrays map
/// onto the obvious variants, enum constants are written `{"enum": "NAME"}`.
/// Dates serialize as RFC 3339 strings and come back as `String`; the coercion
/// step of the filter stage turns them into dates against temporal columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// NULL / absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Enum constant, rendered and bound by its symbolic name
    Enum {
        #[serde(rename = "enum")]
        name: String,
    },
    /// Point in time (UTC)
    Date(DateTime<Utc>),
    /// Array of values (IN lists, X bindings)
    Array(Vec<Value>),
}

impl Value {
    /// Enum constant with the given symbolic name.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Value::Enum { name: name.into() }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `0`, `0.0` and numeric strings equal to zero.
    pub fn is_numeric_zero(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::String(s) => s.trim().parse::<f64>().is_ok_and(|n| n == 0.0),
            _ => false,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Enum { .. } => "enum",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
        }
    }

    /// Form handed to placeholder binding: enum constants travel as their name.
    pub fn to_bind(&self) -> Value {
        match self {
            Value::Enum { name } => Value::String(name.clone()),
            v => v.clone(),
        }
    }
}

/// Natural text form, unquoted.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Enum { name } => write!(f, "{}", name),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
