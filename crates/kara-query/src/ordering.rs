//! Sort directives.
//!
//! An [`OrderBy`] is what a request asks for (`-price`); a [`SortKey`] is the
//! same directive after its path was checked against a schema.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::lookup::{LookupPath, ResolvedLookup};
use crate::schema::Schema;
use crate::traits::Record;
use crate::value::Value;

/// Prefix marking a descending ordering parameter (`-price`).
pub const DESC_PREFIX: char = '-';

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Reverses `ordering` when descending.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sort directive: a lookup path and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field name or lookup path, e.g. `registry__wedding_date`.
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Parses an ordering parameter: `price` is ascending, `-price` descending.
    ///
    /// Returns `None` for an empty field name.
    pub fn parse(param: &str) -> Option<Self> {
        let param = param.trim();
        let (field, dir) = match param.strip_prefix(DESC_PREFIX) {
            Some(rest) => (rest, Dir::Desc),
            None => (param, Dir::Asc),
        };
        if field.is_empty() {
            None
        } else {
            Some(OrderBy::new(field, dir))
        }
    }

    /// Encodes this ordering as a parameter value (inverse of [`OrderBy::parse`]).
    pub fn to_param(&self) -> String {
        match self.dir {
            Dir::Asc => self.field.clone(),
            Dir::Desc => format!("{DESC_PREFIX}{}", self.field),
        }
    }

    pub fn flipped(&self) -> Self {
        OrderBy::new(self.field.clone(), self.dir.flip())
    }

    /// Resolves the field path against a schema.
    pub fn resolve(&self, schema: &'static Schema) -> Result<SortKey> {
        let lookup = LookupPath::new(&self.field).resolve(schema)?;
        Ok(SortKey {
            lookup,
            dir: self.dir,
        })
    }

    /// Missing values sort last in both directions. `None` when the values
    /// are not comparable.
    pub fn compare<'a>(&self, a: &Value<'a>, b: &Value<'a>) -> Option<Ordering> {
        compare_directed(self.dir, a, b)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// An ordering whose path has been resolved against a schema.
#[derive(Debug, Clone)]
pub struct SortKey {
    lookup: ResolvedLookup,
    dir: Dir,
}

impl SortKey {
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Compares two records on this key.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record) -> Option<Ordering> {
        let val_a = self.lookup.first_value(a);
        let val_b = self.lookup.first_value(b);
        compare_directed(self.dir, &val_a, &val_b)
    }
}

fn compare_directed(dir: Dir, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a.is_none(), b.is_none()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        (false, false) => compare_values(a, b).map(|ordering| dir.apply(ordering)),
    }
}

/// Undirected comparison of two values of one kind; related records compare
/// by their text. `None` for mismatched kinds and NaN.
pub fn compare_values<'a>(a: &Value<'a>, b: &Value<'a>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Record(a), Value::Record(b)) => Some(a.to_string().cmp(&b.to_string())),
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),
        _ => None,
    }
}

/// Lexicographic comparison over `keys`, first key first. Incomparable
/// values count as equal.
pub fn compare_by_keys(a: &dyn Record, b: &dyn Record, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .filter_map(|key| key.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
