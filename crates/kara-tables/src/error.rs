//! Error types for the tables crate.

use std::path::PathBuf;

use kara_query::{FieldKind, QueryError};
use thiserror::Error;

/// Errors raised while building a table for one request.
#[derive(Debug, Error)]
pub enum TableError {
    /// The requested page does not exist.
    #[error("invalid page {page}: expected a page between 1 and {num_pages}")]
    InvalidPage { page: i64, num_pages: usize },

    /// A plain search field resolves to a type that cannot be searched as text.
    #[error("search only supports text-like fields (`{field}` field type is `{kind}`)")]
    UnsupportedSearchField { field: String, kind: FieldKind },

    /// A search term under a `regex`/`iregex` lookup does not compile.
    #[error("invalid search pattern `{pattern}`: {source}")]
    InvalidSearchPattern {
        pattern: String,
        #[source]
        source: QueryError,
    },

    /// A declared lookup does not resolve against the schema.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The settings file could not be read.
    #[error("failed to read settings from {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`TableSettings`](crate::TableSettings).
    #[error("invalid table settings: {0}")]
    SettingsParse(#[from] toml::de::Error),
}

impl TableError {
    /// Returns `true` for errors caused by user input that should map to a
    /// "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::InvalidPage { .. })
    }

    /// Returns `true` for errors caused by the request's parameters rather
    /// than the table declaration.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            TableError::InvalidPage { .. } | TableError::InvalidSearchPattern { .. }
        )
    }

    /// Returns `true` for errors in the table declaration itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TableError::UnsupportedSearchField { .. } | TableError::Query(_)
        )
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
