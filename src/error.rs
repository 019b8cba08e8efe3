//! Error types for sqli.

use thiserror::Error;

/// The main error type for condition compilation.
#[derive(Debug, Error)]
pub enum SqliError {
    /// A comparison references a field its schema does not declare.
    #[error("Property of {schema} not exists: {field}")]
    Schema { schema: String, field: String },

    /// The schema lookup has no entry for this name (or alias target).
    #[error("Unknown schema: '{0}'")]
    UnknownSchema(String),

    /// Key text that is not `field` or `alias.field`.
    #[error("Invalid key: '{0}'")]
    InvalidKey(String),

    /// IN / NOT IN without a single element to dispatch on.
    #[error("Empty membership list for '{key}'")]
    EmptyMembership { key: String },

    /// IN / NOT IN list whose elements do not share one literal kind.
    #[error("Mixed membership list for '{key}': expected {expected} literals, found {found}")]
    MixedMembership {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Sub-groups nested deeper than the configured limit.
    #[error("Condition tree nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SqliError {
    /// Create a field-not-found schema error.
    pub fn field_not_found(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Schema {
            schema: schema.into(),
            field: field.into(),
        }
    }

    /// Whether this error is detectable before any SQL reaches a database.
    pub fn is_construction_error(&self) -> bool {
        !matches!(
            self,
            Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Toml(_)
        )
    }
}

/// Result type alias for sqli operations.
pub type SqliResult<T> = Result<T, SqliError>;
