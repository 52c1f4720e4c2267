//! Field values as seen by lookups and orderings.
//!
//! A [`Value`] borrows from the record it was read from. Relation fields
//! yield the related records themselves, so lookup paths can walk through them.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::traits::Record;

/// Date format used for the textual form of [`Value::Date`].
pub const ISO_DATE: &str = "%Y-%m-%d";

/// A field value borrowed from its record.
#[derive(Clone)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    Date(NaiveDate),
    Bool(bool),
    /// Target of a reference field.
    Record(&'a dyn Record),
    /// Targets of a many-relation field.
    Records(Vec<&'a dyn Record>),
    /// Unknown field or empty optional.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Value::Record(_) | Value::Records(_))
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Related records; a reference yields a one-element list.
    pub fn as_records(&self) -> Vec<&'a dyn Record> {
        match self {
            Value::Record(r) => vec![*r],
            Value::Records(rs) => rs.clone(),
            _ => Vec::new(),
        }
    }

    /// Returns the textual form used by string operators.
    ///
    /// Related records use their `Display` text. Lists of records and
    /// `None` have no textual form.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(*s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Date(d) => Some(Cow::Owned(d.format(ISO_DATE).to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Record(r) => Some(Cow::Owned(r.to_string())),
            Value::Records(_) | Value::None => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(&r.to_string()).finish(),
            Value::Records(rs) => f
                .debug_tuple("Records")
                .field(&rs.iter().map(|r| r.to_string()).collect::<Vec<_>>())
                .finish(),
            Value::None => write!(f, "None"),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => same_record(*a, *b),
            (Value::Records(a), Value::Records(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_record(*x, *y))
            }
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

fn same_record(a: &dyn Record, b: &dyn Record) -> bool {
    std::ptr::addr_eq(a, b)
}

/// A number keeping the precision of the field it came from: prices
/// stay integers, only fractional fields become `F64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Same-kind numbers compare exactly; mixed kinds compare as `f64`.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    /// Parses user input as a number.
    ///
    /// Integers keep integer precision; anything else with a decimal
    /// point is read as floating point.
    pub fn parse(input: &str) -> Option<Number> {
        let input = input.trim();
        if let Ok(n) = input.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = input.parse::<u64>() {
            return Some(Number::U64(n));
        }
        input
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty; $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64; i8, i16, i32, i64, isize);
number_from!(U64, u64; u8, u16, u32, u64, usize);
number_from!(F64, f64; f32, f64);
