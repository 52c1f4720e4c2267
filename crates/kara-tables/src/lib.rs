//! Kara tables - pagination, search and sorting for record listings.
//!
//! A table turns a request's query parameters into one page of records:
//!
//! ```text
//! ?search=sky&order=-price&order=name&page=2
//!      │            │                  │
//!      ▼            ▼                  ▼
//!   Search   →    Sorter      →    Pagination   →   rows / headers / links
//! ```
//!
//! The steps always run in this order over a lazy
//! [`Collection`](kara_query::Collection): search narrows the candidates,
//! sorting orders them, and pagination slices a window. Only the final page
//! is materialised.
//!
//! # Parameters
//!
//! | Parameter | Meaning |
//! |-----------|---------|
//! | `page` | 1-indexed page number; anything non-numeric means page 1 |
//! | `search` | free text matched against the declared search lookups |
//! | `order` | repeatable; `field` or `-field`, the last value is the primary key |
//!
//! Names and defaults come from [`TableSettings`].
//!
//! # Errors
//!
//! - Declaring a non-text field as a plain search lookup is a configuration
//!   error ([`TableError::UnsupportedSearchField`]).
//! - Requesting a page past the end is a user error
//!   ([`TableError::InvalidPage`], see [`TableError::is_not_found`]).
//! - Empty search values, empty or unknown sort directives are ignored.

mod display;
mod error;
mod pagination;
mod params;
mod search;
mod settings;
mod sort;
mod table;

pub use display::{
    display_value, format_date, format_field, intcomma, truncate_words, Cell, Chip,
    TRUNCATION_MARK,
};
pub use error::{Result, TableError};
pub use pagination::{
    parse_page_number, PageEntry, PageLink, PageRange, Pagination, PaginationSummary, ELLIPSIS,
};
pub use params::QueryParams;
pub use search::{apply_search, is_searchable, Search, SearchForm, SearchLookup, DEFAULT_SEARCH_OP};
pub use settings::TableSettings;
pub use sort::{Header, Sorter};
pub use table::{Row, Table, TableDefinition, TablePage};
