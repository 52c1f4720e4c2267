//! Record predicates.

use crate::clause::{Clause, ClauseValue};
use crate::error::Result;
use crate::op::Op;
use crate::schema::Schema;
use crate::traits::Record;

/// A predicate over records, built from three clause groups.
///
/// A record matches when every AND clause matches, at least one OR clause
/// matches (an empty OR group always passes), and no NOT clause matches.
///
/// ```
/// use kara_query::Query;
///
/// let query = Query::new()
///     .and_gte("price", 10000u64)
///     .or_icontains("name", "lamp")
///     .or_icontains("tags", "kitchen")
///     .not_exact("registry__side", "bride");
/// assert_eq!(query.or_clauses().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
}

impl Query {
    /// The empty query, which matches every record.
    pub fn new() -> Self {
        Query::default()
    }

    /// A query matching records that satisfy any of `clauses`.
    pub fn any<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Clause>,
    {
        Query {
            or_clauses: clauses.into_iter().collect(),
            ..Query::default()
        }
    }

    pub fn and(self, path: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.push_and(Clause::new(path, op, value))
    }

    pub fn or(self, path: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.push_or(Clause::new(path, op, value))
    }

    pub fn not(self, path: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.push_not(Clause::new(path, op, value))
    }

    pub fn push_and(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    pub fn push_or(mut self, clause: Clause) -> Self {
        self.or_clauses.push(clause);
        self
    }

    pub fn push_not(mut self, clause: Clause) -> Self {
        self.not_clauses.push(clause);
        self
    }

    pub fn and_exact(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(path, Op::Exact, value)
    }

    pub fn and_iexact(self, path: &str, value: &str) -> Self {
        self.and(path, Op::IExact, value)
    }

    pub fn and_gt(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(path, Op::Gt, value)
    }

    pub fn and_gte(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(path, Op::Gte, value)
    }

    pub fn and_lt(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(path, Op::Lt, value)
    }

    pub fn and_contains(self, path: &str, value: &str) -> Self {
        self.and(path, Op::Contains, value)
    }

    pub fn and_icontains(self, path: &str, value: &str) -> Self {
        self.and(path, Op::IContains, value)
    }

    pub fn and_startswith(self, path: &str, value: &str) -> Self {
        self.and(path, Op::StartsWith, value)
    }

    pub fn and_istartswith(self, path: &str, value: &str) -> Self {
        self.and(path, Op::IStartsWith, value)
    }

    /// Fails when `pattern` does not compile.
    pub fn and_regex(self, path: &str, pattern: &str) -> Result<Self> {
        Ok(self.push_and(Clause::regex(path, pattern, false)?))
    }

    /// Matches when the value's text is one of `values`.
    pub fn and_in<I, S>(self, path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<String> = values.into_iter().map(Into::into).collect();
        self.and(path, Op::In, ClauseValue::List(set))
    }

    pub fn and_isnull(self, path: &str, is_null: bool) -> Self {
        self.and(path, Op::IsNull, is_null)
    }

    pub fn or_exact(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.or(path, Op::Exact, value)
    }

    pub fn or_contains(self, path: &str, value: &str) -> Self {
        self.or(path, Op::Contains, value)
    }

    pub fn or_icontains(self, path: &str, value: &str) -> Self {
        self.or(path, Op::IContains, value)
    }

    pub fn not_exact(self, path: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(path, Op::Exact, value)
    }

    pub fn not_isnull(self, path: &str, is_null: bool) -> Self {
        self.not(path, Op::IsNull, is_null)
    }

    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    pub fn or_clauses(&self) -> &[Clause] {
        &self.or_clauses
    }

    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().next().is_none()
    }

    fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.and_clauses
            .iter()
            .chain(&self.or_clauses)
            .chain(&self.not_clauses)
    }

    /// Checks that every clause path resolves against `schema`.
    pub fn validate(&self, schema: &'static Schema) -> Result<()> {
        self.clauses().try_for_each(|clause| clause.validate(schema))
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        self.and_clauses.iter().all(|c| c.matches_record(record))
            && (self.or_clauses.is_empty()
                || self.or_clauses.iter().any(|c| c.matches_record(record)))
            && !self.not_clauses.iter().any(|c| c.matches_record(record))
    }

    /// Matching records of `items`, in order.
    pub fn filter<'a, T: Record>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    pub fn count<T: Record>(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(*item)).count()
    }

    pub fn find<'a, T: Record>(&self, items: &'a [T]) -> Option<&'a T> {
        items.iter().find(|item| self.matches(*item))
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::schema::{Field, FieldKind};
    use crate::traits::ToValue;
    use crate::value::Value;

    static GUEST: Schema = Schema {
        name: "guest",
        primary_key: "name",
        fields: &[
            Field::new("name", FieldKind::ShortText, "name"),
            Field::new("amount", FieldKind::Numeric, "amount"),
            Field::new("attended", FieldKind::Boolean, "attended"),
            Field::new("message", FieldKind::LongText, "message"),
        ],
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Guest {
        name: String,
        amount: i64,
        attended: bool,
        message: Option<String>,
    }

    impl fmt::Display for Guest {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.name)
        }
    }

    impl Record for Guest {
        fn record_schema(&self) -> &'static Schema {
            &GUEST
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.to_value(),
                "amount" => self.amount.to_value(),
                "attended" => self.attended.to_value(),
                "message" => self.message.to_value(),
                _ => Value::None,
            }
        }
    }

    fn guest(name: &str, amount: i64, attended: bool) -> Guest {
        Guest {
            name: name.to_string(),
            amount,
            attended,
            message: None,
        }
    }

    fn guests() -> Vec<Guest> {
        vec![
            guest("Aunt Mira", 50000, true),
            guest("Uncle Joon", 100000, true),
            guest("Coworker Dana", 30000, false),
            Guest {
                message: Some("Congratulations!".to_string()),
                ..guest("Coworker Eli", 100000, false)
            },
            guest("Cousin Ha", 70000, true),
        ]
    }

    #[test]
    fn empty_query_matches_all() {
        assert!(Query::new().is_empty());
        assert_eq!(Query::new().count(&guests()), 5);
    }

    #[test]
    fn and_clauses_all_match() {
        let guests = guests();
        let found = Query::new()
            .and_exact("amount", 100000i64)
            .and_exact("attended", true)
            .filter(&guests);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Uncle Joon");
    }

    #[test]
    fn or_group_needs_one_match() {
        let guests = guests();
        let query = Query::new()
            .or_contains("name", "Aunt")
            .or_contains("name", "Uncle");
        assert_eq!(query.count(&guests), 2);
    }

    #[test]
    fn groups_combine() {
        let guests = guests();
        // amount >= 70000 AND (Coworker OR Cousin) AND NOT attended
        let found = Query::new()
            .and_gte("amount", 70000i64)
            .or_contains("name", "Coworker")
            .or_contains("name", "Cousin")
            .not_exact("attended", true)
            .filter(&guests);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Coworker Eli");
    }

    #[test]
    fn any_builds_disjunction() {
        let query = Query::any([
            Clause::new("name", Op::IContains, "aunt"),
            Clause::new("name", Op::IContains, "cousin"),
        ]);
        assert!(query.and_clauses().is_empty());
        assert_eq!(query.count(&guests()), 2);
    }

    #[test]
    fn isnull() {
        let guests = guests();
        assert_eq!(Query::new().and_isnull("message", false).count(&guests), 1);
        assert_eq!(Query::new().and_isnull("message", true).count(&guests), 4);
        assert_eq!(Query::new().not_isnull("message", true).count(&guests), 1);
    }

    #[test]
    fn regex_and_in() {
        let guests = guests();
        let query = Query::new().and_regex("name", r"^Coworker \w+$").unwrap();
        assert_eq!(query.count(&guests), 2);
        assert_eq!(
            Query::new().and_in("amount", ["30000", "70000"]).count(&guests),
            2
        );
    }

    #[test]
    fn find_first_match() {
        let guests = guests();
        let found = Query::new().and_gt("amount", 60000i64).find(&guests);
        assert_eq!(found.map(|g| g.name.as_str()), Some("Uncle Joon"));
        assert!(Query::new().and_lt("amount", 0i64).find(&guests).is_none());
    }

    #[test]
    fn unknown_fields() {
        assert!(Query::new().and_exact("name", "x").validate(&GUEST).is_ok());
        assert!(Query::new().or_exact("table", "7").validate(&GUEST).is_err());
        assert_eq!(Query::new().and_exact("table", "7").count(&guests()), 0);
    }
}
