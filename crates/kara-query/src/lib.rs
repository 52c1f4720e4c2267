//! Kara query - schema-aware record collections.
//!
//! This crate is the record layer the table engine works against. It
//! provides:
//!
//! - Static schemas: named fields with a semantic [`FieldKind`], labels,
//!   choice sets, and relation targets
//! - The object-safe [`Record`] trait and its [`Model`] extension, usually
//!   implemented with `#[derive(Record)]` from `kara-macros`
//! - Lookup paths that cross relations (`registry__owner__username`)
//! - Rich operators: exact, case-insensitive, substring, prefix, suffix,
//!   regex, comparisons, set membership, null checks
//! - Clause groups: AND, OR, NOT with fixed combination semantics
//! - A lazy [`Collection`] trait with an in-memory implementation
//!
//! # Quick Start
//!
//! ```rust
//! use std::fmt;
//! use kara_query::{
//!     Collection, Field, FieldKind, MemoryCollection, Model, OrderBy, Query, Record,
//!     Schema, ToValue, Value,
//! };
//!
//! struct Gift {
//!     name: String,
//!     price: u64,
//! }
//!
//! static GIFT: Schema = Schema {
//!     name: "gift",
//!     primary_key: "name",
//!     fields: &[
//!         Field::new("name", FieldKind::ShortText, "name"),
//!         Field::new("price", FieldKind::Numeric, "price"),
//!     ],
//! };
//!
//! impl fmt::Display for Gift {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str(&self.name)
//!     }
//! }
//!
//! impl Record for Gift {
//!     fn record_schema(&self) -> &'static Schema {
//!         &GIFT
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => self.name.to_value(),
//!             "price" => self.price.to_value(),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! impl Model for Gift {
//!     fn schema() -> &'static Schema {
//!         &GIFT
//!     }
//! }
//!
//! let gifts = vec![
//!     Gift { name: "Toaster".into(), price: 30000 },
//!     Gift { name: "Envelope".into(), price: 100000 },
//!     Gift { name: "Teapot".into(), price: 15000 },
//! ];
//!
//! let found = MemoryCollection::new(&gifts)
//!     .filter(Query::new().and_istartswith("name", "t"))?
//!     .order_by(vec![OrderBy::desc("price")])
//!     .fetch();
//!
//! assert_eq!(found.len(), 2);
//! assert_eq!(found[0].name, "Toaster");
//! # Ok::<(), kara_query::QueryError>(())
//! ```
//!
//! # Query Semantics
//!
//! Queries combine three clause groups with fixed logic:
//!
//! ```text
//! match = (all AND clauses match)
//!       ∧ (at least one OR clause matches, OR no OR clauses exist)
//!       ∧ (no NOT clause matches)
//! ```
//!
//! A clause whose path crosses a many-valued relation matches when any of
//! the reachable values matches.
//!
//! # Field Kinds and Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | Text, choice | all text operators, comparisons, `in`, `isnull` |
//! | Numeric, date | `exact`, `gt`, `gte`, `lt`, `lte`, `in`, `isnull` |
//! | Boolean | `exact`, `isnull` |
//! | Reference, many relation | text operators on the related record's text, `isnull` |

mod clause;
mod collection;
mod error;
mod lookup;
mod op;
mod ordering;
mod query;
mod schema;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseValue};
pub use collection::{Collection, MemoryCollection};
pub use error::{QueryError, Result};
pub use lookup::{LookupPath, ResolvedLookup, LOOKUP_SEP};
pub use op::Op;
pub use ordering::{compare_by_keys, compare_values, Dir, OrderBy, SortKey, DESC_PREFIX};
pub use query::Query;
pub use schema::{Choices, Field, FieldKind, Schema};
pub use traits::{Model, Record, ToValue};
pub use value::{Number, Value, ISO_DATE};
