//! Table settings.
//!
//! Parameter names and pagination defaults shared by every table. All keys
//! are optional in the TOML form:
//!
//! ```toml
//! page_var = "p"
//! per_page = 25
//! on_each_side = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Query parameter names and pagination defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableSettings {
    /// Page number parameter.
    pub page_var: String,
    /// Free-text search parameter.
    pub search_var: String,
    /// Repeatable ordering parameter.
    pub order_var: String,
    /// Page size used when a table does not declare its own.
    pub per_page: usize,
    /// Pages listed on each side of the current page in page ranges.
    pub on_each_side: usize,
    /// Pages listed at each end of page ranges.
    pub on_ends: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            page_var: "page".to_string(),
            search_var: "search".to_string(),
            order_var: "order".to_string(),
            per_page: 10,
            on_each_side: 3,
            on_ends: 2,
        }
    }
}

impl TableSettings {
    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| TableError::SettingsIo {
                path: path.as_ref().to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = TableSettings::default();
        assert_eq!(settings.page_var, "page");
        assert_eq!(settings.search_var, "search");
        assert_eq!(settings.order_var, "order");
        assert_eq!(settings.per_page, 10);
        assert_eq!((settings.on_each_side, settings.on_ends), (3, 2));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = TableSettings::from_toml_str("page_var = \"p\"\nper_page = 25\n").unwrap();
        assert_eq!(settings.page_var, "p");
        assert_eq!(settings.per_page, 25);
        assert_eq!(settings.order_var, "order");
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            TableSettings::from_toml_str("").unwrap(),
            TableSettings::default()
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = TableSettings::from_toml_str("per_pages = 3").unwrap_err();
        assert!(matches!(err, TableError::SettingsParse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TableSettings::load("/nonexistent/kara/tables.toml").unwrap_err();
        match err {
            TableError::SettingsIo { path, .. } => {
                assert!(path.ends_with("tables.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        std::fs::write(&path, "search_var = \"q\"\non_ends = 1\n").unwrap();

        let settings = TableSettings::load(&path).unwrap();
        assert_eq!(settings.search_var, "q");
        assert_eq!(settings.on_ends, 1);
    }
}
