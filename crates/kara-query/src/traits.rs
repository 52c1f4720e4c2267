//! Traits for derive macro support.
//!
//! This module provides the [`Record`] and [`Model`] traits which are
//! implemented by the `#[derive(Record)]` macro, and the [`ToValue`]
//! conversion the generated accessors use.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::schema::Schema;
use crate::value::{Number, Value};

/// A record whose fields can be read by name.
///
/// The trait is object safe so that related records can be traversed
/// through `&dyn Record`. The `Display` text is the record's
/// human-readable representation; it is what string lookups compare
/// against when a lookup path ends on a relation.
///
/// # Manual Implementation
///
/// ```
/// use std::fmt;
/// use kara_query::{Field, FieldKind, Model, Record, Schema, ToValue, Value};
///
/// struct Tag {
///     name: String,
/// }
///
/// static TAG: Schema = Schema {
///     name: "tag",
///     primary_key: "name",
///     fields: &[Field::new("name", FieldKind::ShortText, "name")],
/// };
///
/// impl fmt::Display for Tag {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(&self.name)
///     }
/// }
///
/// impl Record for Tag {
///     fn record_schema(&self) -> &'static Schema {
///         &TAG
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => self.name.to_value(),
///             _ => Value::None,
///         }
///     }
/// }
///
/// impl Model for Tag {
///     fn schema() -> &'static Schema {
///         &TAG
///     }
/// }
/// ```
pub trait Record: fmt::Display {
    /// Returns the schema of this record's type.
    fn record_schema(&self) -> &'static Schema;

    /// Returns the value of a field, or [`Value::None`] if the field
    /// doesn't exist.
    fn field_value(&self, field: &str) -> Value<'_>;
}

/// A record type with a statically known schema.
pub trait Model: Record + Sized {
    /// Returns the schema shared by all records of this type.
    fn schema() -> &'static Schema;
}

impl<T: Record + ?Sized> Record for Arc<T> {
    fn record_schema(&self) -> &'static Schema {
        (**self).record_schema()
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// Shared records list like the records they point at.
impl<T: Model> Model for Arc<T> {
    fn schema() -> &'static Schema {
        T::schema()
    }
}

/// Conversion from a field's Rust type into a [`Value`].
pub trait ToValue {
    /// Borrows this field as a query value.
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self.as_str())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value<'_> {
        Value::Date(*self)
    }
}

macro_rules! number_to_value {
    ($($source:ty),*) => {
        $(
            impl ToValue for $source {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_to_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Record> ToValue for Arc<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Record(&**self)
    }
}

impl<T: Record> ToValue for Rc<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Record(&**self)
    }
}

impl<T: Record> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Record(&**self)
    }
}

impl<T: Record> ToValue for Vec<Arc<T>> {
    fn to_value(&self) -> Value<'_> {
        Value::Records(self.iter().map(|r| &**r as &dyn Record).collect())
    }
}
