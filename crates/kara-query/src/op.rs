//! Lookup operators.
//!
//! Operators are spelled as lookup suffixes (`name__iexact`, `price__gte`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Which values an operator applies to:
/// - **Universal**: `Exact`, `In`, `IsNull` - work on all types
/// - **Text**: `IExact`, `Contains`, `IContains`, `StartsWith`, `IStartsWith`,
///   `EndsWith`, `IEndsWith`, `Regex`, `IRegex`
/// - **Ordered**: `Gt`, `Gte`, `Lt`, `Lte` - numbers, dates, and text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Regex,
    IRegex,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Text form is one of a set.
    In,
    /// Value is (or is not) missing.
    IsNull,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 16] = [
        Op::Exact,
        Op::IExact,
        Op::Contains,
        Op::IContains,
        Op::StartsWith,
        Op::IStartsWith,
        Op::EndsWith,
        Op::IEndsWith,
        Op::Regex,
        Op::IRegex,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::IsNull,
    ];

    /// Parses a lookup suffix such as `icontains`.
    pub fn from_lookup(suffix: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.as_str() == suffix)
    }

    pub fn is_text_op(self) -> bool {
        matches!(
            self,
            Op::IExact
                | Op::Contains
                | Op::IContains
                | Op::StartsWith
                | Op::IStartsWith
                | Op::EndsWith
                | Op::IEndsWith
                | Op::Regex
                | Op::IRegex
        )
    }

    /// Returns `true` if this operator is evaluated from an [`Ordering`].
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Exact | Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` for the equality operators that compare a whole value.
    pub fn is_exact(self) -> bool {
        matches!(self, Op::Exact | Op::IExact)
    }

    /// Returns `true` for case-insensitive operators.
    pub fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Op::IExact | Op::IContains | Op::IStartsWith | Op::IEndsWith | Op::IRegex
        )
    }

    /// Whether `ordering` (field value against clause value) satisfies
    /// this operator.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Exact | Op::IExact => ordering == Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Evaluates a text operator against a field's text.
    ///
    /// Regex operators are evaluated by the clause, which owns the compiled
    /// pattern; they always return `false` here.
    pub fn eval_text(self, field: &str, pattern: &str) -> bool {
        match self {
            Op::Exact => field == pattern,
            Op::Contains => field.contains(pattern),
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::IExact => field.to_lowercase() == pattern.to_lowercase(),
            Op::IContains => field.to_lowercase().contains(&pattern.to_lowercase()),
            Op::IStartsWith => field.to_lowercase().starts_with(&pattern.to_lowercase()),
            Op::IEndsWith => field.to_lowercase().ends_with(&pattern.to_lowercase()),
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => self.eval_ordering(field.cmp(pattern)),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Exact => "exact",
            Op::IExact => "iexact",
            Op::Contains => "contains",
            Op::IContains => "icontains",
            Op::StartsWith => "startswith",
            Op::IStartsWith => "istartswith",
            Op::EndsWith => "endswith",
            Op::IEndsWith => "iendswith",
            Op::Regex => "regex",
            Op::IRegex => "iregex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
            Op::IsNull => "isnull",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Op {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_lookup(s).ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_lookup_names_round_trip() {
        for op in Op::ALL {
            assert_eq!(Op::from_lookup(op.as_str()), Some(op));
        }
        assert_eq!(Op::from_lookup("eq"), None);
        assert!("nope".parse::<Op>().is_err());
    }

    #[test]
    fn op_type_checks() {
        assert!(Op::IContains.is_text_op());
        assert!(Op::Regex.is_text_op());
        assert!(!Op::Gt.is_text_op());
        assert!(!Op::Exact.is_text_op());

        assert!(Op::Exact.is_ordering_op());
        assert!(!Op::In.is_ordering_op());

        assert!(Op::IExact.is_exact());
        assert!(!Op::Contains.is_exact());

        assert!(Op::IStartsWith.is_case_insensitive());
        assert!(!Op::StartsWith.is_case_insensitive());
    }

    #[test]
    fn op_eval_ordering() {
        assert!(Op::Exact.eval_ordering(Ordering::Equal));
        assert!(!Op::Exact.eval_ordering(Ordering::Less));

        assert!(!Op::Gt.eval_ordering(Ordering::Equal));
        assert!(Op::Gt.eval_ordering(Ordering::Greater));

        assert!(Op::Gte.eval_ordering(Ordering::Equal));
        assert!(!Op::Gte.eval_ordering(Ordering::Less));

        assert!(Op::Lt.eval_ordering(Ordering::Less));
        assert!(!Op::Lt.eval_ordering(Ordering::Equal));

        assert!(Op::Lte.eval_ordering(Ordering::Equal));
        assert!(!Op::Lte.eval_ordering(Ordering::Greater));

        assert!(!Op::Contains.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn op_eval_text() {
        assert!(Op::Exact.eval_text("Sunny Hill", "Sunny Hill"));
        assert!(!Op::Exact.eval_text("Sunny Hill", "sunny hill"));
        assert!(Op::IExact.eval_text("Sunny Hill", "sunny hill"));
        assert!(Op::IContains.eval_text("Blue Sky", "sky"));
        assert!(!Op::Contains.eval_text("Blue Sky", "sky"));
        assert!(Op::StartsWith.eval_text("Happy Cloud", "Happy"));
        assert!(Op::IEndsWith.eval_text("Red Sky", "SKY"));
        assert!(Op::Lt.eval_text("apple", "banana"));
    }

    #[test]
    fn op_display() {
        assert_eq!(Op::IExact.to_string(), "iexact");
        assert_eq!(Op::IsNull.to_string(), "isnull");
    }
}
