//! Lookup paths.
//!
//! A [`LookupPath`] is a chain of field names such as `registry__owner__username`
//! (or, equivalently, `registry.owner.username`). Resolving it against a
//! [`Schema`] walks the relation graph and yields a [`ResolvedLookup`]: the
//! fields crossed, the terminal field, and an optional operator suffix.

use std::fmt;

use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::schema::{Field, Schema};
use crate::traits::Record;
use crate::value::Value;

/// Separator between lookup segments.
pub const LOOKUP_SEP: &str = "__";

/// An unresolved chain of field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupPath {
    segments: Vec<String>,
}

impl LookupPath {
    /// Splits a raw lookup string on `__` and `.`.
    ///
    /// Splitting never fails; empty segments are reported when the path is
    /// resolved.
    pub fn new(raw: &str) -> Self {
        let segments = raw
            .split(LOOKUP_SEP)
            .flat_map(|part| part.split('.'))
            .map(str::to_string)
            .collect();
        LookupPath { segments }
    }

    /// Builds a path from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LookupPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Resolves this path against a schema.
    ///
    /// Every segment but the last must name a relation field. The last
    /// segment names either a field or, when it is not a field of the
    /// current model, an operator applied to the previous field. Field
    /// names take precedence over operator names.
    pub fn resolve(&self, schema: &'static Schema) -> Result<ResolvedLookup> {
        if self.segments.is_empty() || self.segments.iter().any(String::is_empty) {
            return Err(QueryError::EmptyLookup);
        }

        let mut model = schema;
        let mut fields: Vec<&'static Field> = Vec::with_capacity(self.segments.len());
        let count = self.segments.len();

        for (index, segment) in self.segments.iter().enumerate() {
            let is_last = index + 1 == count;

            if let Some(field) = model.field(segment) {
                fields.push(field);
                if is_last {
                    break;
                }
                match field.related_schema() {
                    Some(related) => model = related,
                    None => {
                        let next = &self.segments[index + 1];
                        if index + 2 == count {
                            return match Op::from_lookup(next) {
                                Some(op) => Ok(ResolvedLookup {
                                    fields,
                                    op: Some(op),
                                }),
                                None => Err(QueryError::UnknownOperator(next.clone())),
                            };
                        }
                        return Err(QueryError::NotARelation {
                            model: model.name,
                            field: segment.clone(),
                            next: next.clone(),
                        });
                    }
                }
                continue;
            }

            if is_last && !fields.is_empty() {
                if let Some(op) = Op::from_lookup(segment) {
                    return Ok(ResolvedLookup {
                        fields,
                        op: Some(op),
                    });
                }
            }
            return Err(QueryError::UnknownField {
                model: model.name,
                field: segment.clone(),
            });
        }

        Ok(ResolvedLookup { fields, op: None })
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(LOOKUP_SEP))
    }
}

impl From<&str> for LookupPath {
    fn from(raw: &str) -> Self {
        LookupPath::new(raw)
    }
}

impl From<String> for LookupPath {
    fn from(raw: String) -> Self {
        LookupPath::new(&raw)
    }
}

impl From<&String> for LookupPath {
    fn from(raw: &String) -> Self {
        LookupPath::new(raw)
    }
}

/// A lookup path checked against a schema.
#[derive(Debug, Clone)]
pub struct ResolvedLookup {
    fields: Vec<&'static Field>,
    op: Option<Op>,
}

impl ResolvedLookup {
    /// The terminal field.
    pub fn field(&self) -> &'static Field {
        // resolve() never produces an empty field list
        self.fields[self.fields.len() - 1]
    }

    /// Relation fields crossed before the terminal field.
    pub fn relations(&self) -> &[&'static Field] {
        &self.fields[..self.fields.len() - 1]
    }

    /// Explicit operator suffix, if the path carried one.
    pub fn op(&self) -> Option<Op> {
        self.op
    }

    /// The field-only part of the path (operator suffix stripped).
    pub fn field_path(&self) -> LookupPath {
        LookupPath::from_segments(self.fields.iter().map(|field| field.name))
    }

    /// Collects every terminal value reachable from `record`.
    ///
    /// Many-valued relations fan out: each related record contributes its
    /// own values. A terminal many-valued relation yields one
    /// [`Value::Record`] per related record.
    pub fn values<'r>(&self, record: &'r dyn Record) -> Vec<Value<'r>> {
        let mut current: Vec<&'r dyn Record> = vec![record];
        for relation in self.relations() {
            current = current
                .into_iter()
                .flat_map(|r| r.field_value(relation.name).as_records())
                .collect();
        }

        let terminal = self.field().name;
        let mut values = Vec::with_capacity(current.len());
        for r in current {
            match r.field_value(terminal) {
                Value::Records(related) => values.extend(related.into_iter().map(Value::Record)),
                value => values.push(value),
            }
        }
        values
    }

    /// The first terminal value reachable from `record`, used for sorting.
    pub fn first_value<'r>(&self, record: &'r dyn Record) -> Value<'r> {
        self.values(record).into_iter().next().unwrap_or(Value::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    static OWNER: Schema = Schema {
        name: "owner",
        primary_key: "id",
        fields: &[
            Field::new("id", FieldKind::Numeric, "id"),
            Field::new("username", FieldKind::ShortText, "username"),
        ],
    };

    fn owner() -> &'static Schema {
        &OWNER
    }

    static SHELF: Schema = Schema {
        name: "shelf",
        primary_key: "id",
        fields: &[
            Field::new("id", FieldKind::Numeric, "id"),
            Field::new("title", FieldKind::ShortText, "title"),
            Field::new("owner", FieldKind::Reference, "owner").with_relation(owner),
        ],
    };

    #[test]
    fn splits_on_both_separators() {
        let path = LookupPath::new("owner__username.iexact");
        assert_eq!(path.segments(), ["owner", "username", "iexact"]);
        assert_eq!(path.to_string(), "owner__username__iexact");
    }

    #[test]
    fn resolves_plain_field() {
        let resolved = LookupPath::new("title").resolve(&SHELF).unwrap();
        assert_eq!(resolved.field().name, "title");
        assert!(resolved.relations().is_empty());
        assert_eq!(resolved.op(), None);
    }

    #[test]
    fn resolves_operator_suffix() {
        let resolved = LookupPath::new("title__iexact").resolve(&SHELF).unwrap();
        assert_eq!(resolved.field().name, "title");
        assert_eq!(resolved.op(), Some(Op::IExact));
        assert_eq!(resolved.field_path().to_string(), "title");
    }

    #[test]
    fn resolves_through_relation() {
        let resolved = LookupPath::new("owner__username__startswith")
            .resolve(&SHELF)
            .unwrap();
        assert_eq!(resolved.field().name, "username");
        assert_eq!(resolved.relations().len(), 1);
        assert_eq!(resolved.op(), Some(Op::StartsWith));

        let on_relation = LookupPath::new("owner__exact").resolve(&SHELF).unwrap();
        assert_eq!(on_relation.field().kind, FieldKind::Reference);
        assert_eq!(on_relation.op(), Some(Op::Exact));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = LookupPath::new("colour").resolve(&SHELF).unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { model: "shelf", .. }));
        assert_eq!(err.to_string(), "`shelf` has no field named `colour`");
    }

    #[test]
    fn rejects_traversal_through_plain_field() {
        let err = LookupPath::new("title__owner__id").resolve(&SHELF).unwrap_err();
        assert!(matches!(err, QueryError::NotARelation { .. }));

        let err = LookupPath::new("title__sounds_like").resolve(&SHELF).unwrap_err();
        assert!(matches!(err, QueryError::UnknownOperator(op) if op == "sounds_like"));
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!(
            LookupPath::new("").resolve(&SHELF),
            Err(QueryError::EmptyLookup)
        ));
        assert!(matches!(
            LookupPath::new("owner____id").resolve(&SHELF),
            Err(QueryError::EmptyLookup)
        ));
    }
}
