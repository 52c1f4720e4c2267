//! Free-text search over declared lookup paths.
//!
//! A search value is matched against every declared lookup and the results
//! are unioned. Lookups ending in `exact` or `iexact` compare the whole value;
//! every other lookup is matched word by word, and a record is kept if any
//! word matches any lookup. Plain lookups (no operator suffix) use
//! case-insensitive containment and must end in a text-like field.

use kara_query::{Clause, ClauseValue, Collection, Field, FieldKind, LookupPath, Op, Query, Schema};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Result, TableError};

/// Operator used by lookups without an explicit suffix.
pub const DEFAULT_SEARCH_OP: Op = Op::IContains;

/// Returns `true` if a field of this kind may be searched without an
/// explicit operator.
pub fn is_searchable(kind: FieldKind) -> bool {
    match kind {
        FieldKind::ShortText
        | FieldKind::LongText
        | FieldKind::Reference
        | FieldKind::ManyRelation => true,
        FieldKind::Choice | FieldKind::Numeric | FieldKind::Boolean | FieldKind::Date => false,
    }
}

/// A declared search lookup, resolved against a schema.
#[derive(Debug, Clone)]
pub struct SearchLookup {
    path: LookupPath,
    field: &'static Field,
    op: Option<Op>,
}

impl SearchLookup {
    /// Resolves `lookup` against `schema`.
    ///
    /// Relation segments are walked without type checks. A plain terminal
    /// field must be text-like; an explicit operator suffix is trusted.
    pub fn resolve(schema: &'static Schema, lookup: &str) -> Result<Self> {
        let resolved = LookupPath::new(lookup).resolve(schema)?;
        let field = resolved.field();

        if resolved.op().is_none() && !is_searchable(field.kind) {
            return Err(TableError::UnsupportedSearchField {
                field: field.name.to_string(),
                kind: field.kind,
            });
        }

        Ok(SearchLookup {
            path: resolved.field_path(),
            field,
            op: resolved.op(),
        })
    }

    /// Path to the terminal field.
    pub fn path(&self) -> &LookupPath {
        &self.path
    }

    /// The terminal field.
    pub fn field(&self) -> &'static Field {
        self.field
    }

    /// Operator applied to search terms.
    pub fn op(&self) -> Op {
        self.op.unwrap_or(DEFAULT_SEARCH_OP)
    }

    /// Whether the whole search value is compared instead of each word.
    pub fn matches_whole_value(&self) -> bool {
        self.op().is_exact()
    }

    fn clause(&self, term: &str) -> Result<Clause> {
        let op = self.op();
        match op {
            Op::Regex | Op::IRegex => Clause::regex(self.path.clone(), term, op == Op::IRegex)
                .map_err(|source| TableError::InvalidSearchPattern {
                    pattern: term.to_string(),
                    source,
                }),
            Op::In => Ok(Clause::new(
                self.path.clone(),
                op,
                ClauseValue::List(vec![term.to_string()]),
            )),
            _ => Ok(Clause::new(self.path.clone(), op, term)),
        }
    }

    fn push_clauses(&self, value: &str, words: &[&str], clauses: &mut Vec<Clause>) -> Result<()> {
        if self.matches_whole_value() {
            clauses.push(self.clause(value)?);
        } else {
            for word in words {
                clauses.push(self.clause(word)?);
            }
        }
        Ok(())
    }
}

/// A resolved set of search lookups.
#[derive(Debug, Clone, Default)]
pub struct Search {
    lookups: Vec<SearchLookup>,
}

impl Search {
    /// Resolves every declared lookup, failing on the first invalid one.
    pub fn new(schema: &'static Schema, fields: &[&str]) -> Result<Self> {
        let lookups = fields
            .iter()
            .map(|lookup| SearchLookup::resolve(schema, lookup))
            .collect::<Result<Vec<_>>>()?;
        Ok(Search { lookups })
    }

    /// The resolved lookups, in declaration order.
    pub fn lookups(&self) -> &[SearchLookup] {
        &self.lookups
    }

    /// Builds the OR query for `value`.
    ///
    /// Returns `None` when nothing should be filtered: no lookups, or a
    /// blank value.
    pub fn query(&self, value: &str) -> Result<Option<Query>> {
        let value = value.trim();
        if self.lookups.is_empty() || value.is_empty() {
            return Ok(None);
        }

        let words: Vec<&str> = value.split_whitespace().collect();
        let mut clauses = Vec::with_capacity(self.lookups.len() * words.len());
        for lookup in &self.lookups {
            lookup.push_clauses(value, &words, &mut clauses)?;
            trace!(path = %lookup.path, op = %lookup.op(), "search lookup");
        }

        debug!(
            search = value,
            words = words.len(),
            clauses = clauses.len(),
            "built search query"
        );
        Ok(Some(Query::any(clauses)))
    }

    /// Narrows `collection` to records matching `value`.
    pub fn apply<C: Collection>(&self, collection: C, value: &str) -> Result<C> {
        match self.query(value)? {
            Some(query) => Ok(collection.filter(query)?),
            None => Ok(collection),
        }
    }
}

/// Narrows `collection` with `value` over the declared `fields`.
///
/// Lookups are only resolved when there is something to search for, so a
/// blank value never fails.
pub fn apply_search<C: Collection>(collection: C, fields: &[&str], value: &str) -> Result<C> {
    if fields.is_empty() || value.trim().is_empty() {
        return Ok(collection);
    }
    let search = Search::new(collection.schema(), fields)?;
    search.apply(collection, value)
}

/// Search form value handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    /// Parameter name of the search input.
    pub name: String,
    /// Current search value.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl SearchForm {
    /// Creates a form for `name` with the current `value`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        SearchForm {
            name: name.into(),
            value: value.into(),
            help_text: None,
        }
    }

    /// Attaches help text.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CHARACTER: Schema = Schema {
        name: "character",
        primary_key: "id",
        fields: &[
            Field::new("id", FieldKind::Numeric, "id"),
            Field::new("nickname", FieldKind::ShortText, "nickname"),
            Field::new("level", FieldKind::Numeric, "level"),
            Field::new("active", FieldKind::Boolean, "active"),
        ],
    };

    #[test]
    fn plain_text_lookup_defaults_to_icontains() {
        let lookup = SearchLookup::resolve(&CHARACTER, "nickname").unwrap();
        assert_eq!(lookup.op(), Op::IContains);
        assert!(!lookup.matches_whole_value());
    }

    #[test]
    fn operator_suffix_is_kept() {
        let lookup = SearchLookup::resolve(&CHARACTER, "nickname__iexact").unwrap();
        assert_eq!(lookup.op(), Op::IExact);
        assert!(lookup.matches_whole_value());
        assert_eq!(lookup.path().to_string(), "nickname");
    }

    #[test]
    fn plain_numeric_lookup_is_rejected() {
        let err = SearchLookup::resolve(&CHARACTER, "level").unwrap_err();
        assert_eq!(
            err.to_string(),
            "search only supports text-like fields (`level` field type is `numeric`)"
        );
    }

    #[test]
    fn operator_suffix_bypasses_type_guard() {
        assert!(SearchLookup::resolve(&CHARACTER, "level__exact").is_ok());
        assert!(SearchLookup::resolve(&CHARACTER, "active").is_err());
    }

    #[test]
    fn query_is_cross_product_of_lookups_and_words() {
        let search = Search::new(&CHARACTER, &["nickname__startswith", "nickname__iexact"]).unwrap();
        let query = search.query("  blue   sky ").unwrap().unwrap();
        // Two words for startswith, one whole value for iexact
        assert_eq!(query.or_clauses().len(), 3);
        assert!(query.and_clauses().is_empty());
    }

    #[test]
    fn blank_value_builds_no_query() {
        let search = Search::new(&CHARACTER, &["nickname"]).unwrap();
        assert!(search.query("   ").unwrap().is_none());
        assert!(Search::default().query("sky").unwrap().is_none());
    }

    #[test]
    fn invalid_regex_term_is_user_input() {
        let search = Search::new(&CHARACTER, &["nickname__regex"]).unwrap();
        let err = search.query("(").unwrap_err();
        assert!(matches!(
            &err,
            TableError::InvalidSearchPattern { pattern, .. } if pattern == "("
        ));
        assert!(err.is_user_input());
        assert!(!err.is_configuration());

        let search = Search::new(&CHARACTER, &["nickname__iregex"]).unwrap();
        assert!(search.query("^blue").unwrap().is_some());
    }

    #[test]
    fn search_form_serializes() {
        let form = SearchForm::new("search", "sky").with_help_text("Find by name");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["name"], "search");
        assert_eq!(json["help_text"], "Find by name");
        let bare = serde_json::to_value(SearchForm::new("q", "")).unwrap();
        assert!(bare.get("help_text").is_none());
    }
}
