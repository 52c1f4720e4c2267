//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur when building lookups or queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A lookup segment does not name a field of the model it is applied to.
    #[error("`{model}` has no field named `{field}`")]
    UnknownField { model: &'static str, field: String },

    /// A lookup tries to traverse through a field that is not a relation.
    #[error("`{model}.{field}` is not a relation and cannot be followed by `{next}`")]
    NotARelation {
        model: &'static str,
        field: String,
        next: String,
    },

    /// A lookup suffix does not name a known operator.
    #[error("unsupported lookup operator: `{0}`")]
    UnknownOperator(String),

    /// The lookup string has no segments.
    #[error("empty lookup path")]
    EmptyLookup,
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
