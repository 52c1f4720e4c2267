//! Single-field predicates.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::lookup::LookupPath;
use crate::op::Op;
use crate::schema::Schema;
use crate::traits::Record;
use crate::value::{Number, Value, ISO_DATE};

/// `path op value`, where the path may cross relations.
///
/// ```
/// use kara_query::{Clause, ClauseValue, Op};
///
/// let clause = Clause::new("registry__receiver", Op::IContains, "kim");
/// assert_eq!(clause.path.to_string(), "registry__receiver");
/// assert!(matches!(clause.value, ClauseValue::String(_)));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    pub path: LookupPath,
    pub op: Op,
    pub value: ClauseValue,
}

impl Clause {
    pub fn new(path: impl Into<LookupPath>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates a clause from a lookup that may carry an operator suffix.
    ///
    /// `price__gte` becomes a `Gte` clause on `price`; a bare field uses
    /// `default_op`. Regex operators compile `value` as a pattern.
    pub fn from_lookup(
        schema: &'static Schema,
        lookup: &str,
        default_op: Op,
        value: &str,
    ) -> Result<Self> {
        let resolved = LookupPath::new(lookup).resolve(schema)?;
        let op = resolved.op().unwrap_or(default_op);
        let value = match op {
            Op::Regex | Op::IRegex => ClauseValue::Regex(compile(value, op)?),
            _ => ClauseValue::String(value.to_string()),
        };
        Ok(Clause {
            path: resolved.field_path(),
            op,
            value,
        })
    }

    /// Fails when `pattern` does not compile.
    pub fn regex(path: impl Into<LookupPath>, pattern: &str, case_insensitive: bool) -> Result<Self> {
        let op = if case_insensitive { Op::IRegex } else { Op::Regex };
        Ok(Clause {
            path: path.into(),
            op,
            value: ClauseValue::Regex(compile(pattern, op)?),
        })
    }

    /// Checks that this clause's path resolves against `schema`.
    pub fn validate(&self, schema: &'static Schema) -> Result<()> {
        self.path.resolve(schema).map(|_| ())
    }

    /// Evaluates this clause against a record.
    ///
    /// The path is resolved to every reachable terminal value; the clause
    /// matches if any of them matches. `isnull` instead asks whether no
    /// non-null value is reachable. A path that does not resolve matches
    /// nothing.
    pub fn matches_record(&self, record: &dyn Record) -> bool {
        let Ok(lookup) = self.path.resolve(record.record_schema()) else {
            return false;
        };
        let values = lookup.values(record);

        match self.op {
            Op::IsNull => {
                let is_null = values.iter().all(Value::is_none);
                let wanted = match &self.value {
                    ClauseValue::Bool(b) => Some(*b),
                    ClauseValue::String(s) => parse_bool(s),
                    _ => None,
                };
                wanted == Some(is_null)
            }
            _ => values.iter().any(|value| self.matches(value)),
        }
    }

    /// Evaluates this clause against one field value. Incompatible kinds
    /// never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.op, &self.value) {
            (Op::In, ClauseValue::List(items)) => items
                .iter()
                .any(|item| match_scalar(Op::Exact, item, field_value)),
            (Op::In, _) | (Op::IsNull, _) => false,
            (_, ClauseValue::Regex(regex)) => field_value
                .to_text()
                .is_some_and(|text| regex.is_match(&text)),
            (op, ClauseValue::String(pattern)) => match_scalar(*op, pattern, field_value),
            (op, ClauseValue::Number(clause)) => match field_value {
                Value::Number(field) => match_number(*op, *field, *clause),
                _ => match_scalar(*op, &clause.to_string(), field_value),
            },
            (op, ClauseValue::Date(clause)) => match field_value {
                Value::Date(field) => op.eval_ordering(field.cmp(clause)),
                _ => false,
            },
            (op, ClauseValue::Bool(clause)) => match field_value {
                Value::Bool(field) => op.eval_ordering(field.cmp(clause)),
                _ => false,
            },
            (_, ClauseValue::List(_)) => false,
        }
    }
}

/// Compares a textual clause value against a field value.
///
/// Text operators compare textual forms. Otherwise the pattern is parsed
/// to the field's type first; unparseable input never matches.
fn match_scalar(op: Op, pattern: &str, field_value: &Value<'_>) -> bool {
    match field_value {
        Value::None | Value::Records(_) => false,
        Value::String(s) => op.eval_text(s, pattern),
        Value::Record(record) => op.eval_text(&record.to_string(), pattern),
        value if op.is_text_op() => value
            .to_text()
            .is_some_and(|text| op.eval_text(&text, pattern)),
        Value::Number(field) => {
            Number::parse(pattern).is_some_and(|clause| match_number(op, *field, clause))
        }
        Value::Date(field) => NaiveDate::parse_from_str(pattern.trim(), ISO_DATE)
            .is_ok_and(|clause| op.eval_ordering(field.cmp(&clause))),
        Value::Bool(field) => parse_bool(pattern).is_some_and(|clause| op.eval_ordering(field.cmp(&clause))),
    }
}

fn match_number(op: Op, field: Number, clause: Number) -> bool {
    match field.compare(clause) {
        Some(ordering) => op.eval_ordering(ordering),
        None => false, // NaN comparison
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn compile(pattern: &str, op: Op) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(op.is_case_insensitive())
        .build()?)
}

/// The right-hand side of a clause, owned so queries can outlive records.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value, parsed to the field's type when compared.
    String(String),
    Number(Number),
    Date(NaiveDate),
    Bool(bool),
    Regex(Regex),
    /// Candidates of `in`.
    List(Vec<String>),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<NaiveDate> for ClauseValue {
    fn from(d: NaiveDate) -> Self {
        ClauseValue::Date(d)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(items: Vec<String>) -> Self {
        ClauseValue::List(items)
    }
}

macro_rules! clause_value_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for ClauseValue {
                fn from(n: $source) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )*
    };
}

clause_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
