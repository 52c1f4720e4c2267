//! Proc macros for Kara.
//!
//! This crate provides the [`Record`] derive, which turns a plain struct into
//! a queryable `kara_query` model.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` and `Model` traits for a struct.
///
/// The struct becomes a `kara_query::Model` whose static `Schema` lists
/// every annotated field in declaration order.
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "..."` | Model name (default: snake case struct name) |
/// | `primary_key = "..."` | Primary key field (default: `id`) |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `ShortText`, `LongText` | Text fields |
/// | `Choice` | Text restricted to `choices = CONST` |
/// | `Numeric`, `Boolean`, `Date` | Scalar fields |
/// | `Reference` | One related record, requires `to = Model` |
/// | `ManyRelation` | Many related records, requires `to = Model` |
/// | `label = "..."` | Human-readable label (default: name with `_` as spaces) |
/// | `rename = "..."` | Use a custom name in lookups |
/// | `skip` | Exclude this field |
///
/// Fields without a `#[field]` attribute are not part of the schema. The
/// field types must implement `kara_query::ToValue`.
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `CashGift::NAME`, `CashGift::RECEIPT_DATE`)
/// 2. `Record::field_value()` and `Record::record_schema()`
/// 3. `Model::schema()` returning a `'static` schema
///
/// # Example
///
/// ```ignore
/// use std::{fmt, sync::Arc};
/// use kara_macros::Record;
/// use kara_query::{Collection, MemoryCollection, Query};
///
/// #[derive(Record)]
/// struct Owner {
///     #[field(Numeric)]
///     id: u64,
///     #[field(ShortText)]
///     username: String,
/// }
///
/// #[derive(Record)]
/// #[record(name = "gift")]
/// struct Gift {
///     #[field(Numeric)]
///     id: u64,
///     #[field(ShortText, label = "gift name")]
///     name: String,
///     #[field(Reference, to = Owner)]
///     owner: Arc<Owner>,
/// }
///
/// // Display impls omitted
///
/// let found = MemoryCollection::new(&gifts)
///     .filter(Query::new().and_iexact("owner__username", "kim"))?
///     .fetch();
/// ```
#[proc_macro_derive(Record, attributes(record, field))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
