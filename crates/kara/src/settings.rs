//! Application settings.
//!
//! ```toml
//! gift_table_per_page = 20
//!
//! [table]
//! search_var = "q"
//! ```

use std::path::Path;

use kara_tables::{TableError, TableSettings};
use serde::{Deserialize, Serialize};

/// Settings of the gift ledger. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    /// Parameter names and paging defaults shared by every table.
    pub table: TableSettings,
    /// Rows per page of the gift tables.
    pub gift_table_per_page: usize,
    /// Registries per page of the dashboard.
    pub dashboard_per_page: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            table: TableSettings::default(),
            gift_table_per_page: 10,
            dashboard_per_page: 2,
        }
    }
}

impl AppSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| TableError::SettingsIo {
                path: path.as_ref().to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
        Ok(toml::from_str(content)?)
    }
}
