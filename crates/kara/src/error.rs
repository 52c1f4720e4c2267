//! Error types for the gift ledger.

use std::io;
use std::path::PathBuf;

use kara_tables::TableError;
use thiserror::Error;

use crate::models::VerificationError;

/// Errors raised by [`Store`](crate::store::Store) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user `{0}` does not exist")]
    UnknownUser(String),

    #[error("a user named `{0}` already exists")]
    DuplicateUser(String),

    /// Missing registries and registries of other owners look the same.
    #[error("registry `{0}` not found")]
    RegistryNotFound(String),

    #[error("registry `{0}` already exists")]
    DuplicateRegistry(String),

    #[error("tag `{0}` not found")]
    TagNotFound(String),

    #[error("a tag named `{0}` already exists")]
    DuplicateTag(String),

    #[error("`{0}` is not in hex color code format")]
    InvalidHexColor(String),

    #[error("`{field}` must not be blank")]
    BlankField { field: &'static str },

    #[error("`{value}` is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("gifts of kind `other` require a detail")]
    MissingKindDetail,

    #[error("registry `{0}` does not record in-kind gifts")]
    InKindGiftsDisabled(String),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("failed to read fixture {}: {source}", path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid fixture: {0}")]
    FixtureParse(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns `true` when the error names something that does not exist
    /// for the requesting owner.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownUser(_) | StoreError::RegistryNotFound(_) | StoreError::TagNotFound(_)
        )
    }
}

/// Errors raised while building a view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The requested page, registry or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request parameters that cannot be used, such as a search pattern
    /// that does not compile.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unknown gift type `{0}`")]
    UnknownGiftType(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Table(TableError),
}

impl ViewError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewError::NotFound(_))
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, ViewError::BadRequest(_) | ViewError::UnknownGiftType(_))
    }
}

impl From<TableError> for ViewError {
    fn from(err: TableError) -> Self {
        if err.is_not_found() {
            ViewError::NotFound(err.to_string())
        } else if err.is_user_input() {
            ViewError::BadRequest(err.to_string())
        } else {
            ViewError::Table(err)
        }
    }
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            ViewError::NotFound(err.to_string())
        } else {
            ViewError::Store(err)
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result alias for views.
pub type ViewResult<T> = std::result::Result<T, ViewError>;
