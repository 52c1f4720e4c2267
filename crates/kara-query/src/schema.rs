//! Static model metadata.
//!
//! A [`Schema`] describes the fields of a record type: their names, semantic
//! kinds, human-readable labels, choice sets, and relation targets. Schemas
//! are `'static` values, normally generated by `#[derive(Record)]`, so that
//! lookups can be resolved before any record is loaded.

use std::fmt;

/// Semantic type of a field.
///
/// This is a closed set: every dispatch over field types (search guards,
/// display formatting) is a `match` on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text.
    ShortText,
    /// Multi-line text.
    LongText,
    /// Text restricted to an enumerated choice set.
    Choice,
    /// Integer or floating point number.
    Numeric,
    /// True / false flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Reference to exactly one related record.
    Reference,
    /// Reference to any number of related records.
    ManyRelation,
}

impl FieldKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::ShortText => "short-text",
            FieldKind::LongText => "long-text",
            FieldKind::Choice => "choice",
            FieldKind::Numeric => "numeric",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Reference => "reference",
            FieldKind::ManyRelation => "many-relation",
        }
    }

    /// Returns `true` for kinds that point at other records.
    pub fn is_relation(self) -> bool {
        matches!(self, FieldKind::Reference | FieldKind::ManyRelation)
    }

    /// Returns `true` for free-text kinds.
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::ShortText | FieldKind::LongText)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Choice set: `(stored value, label)` pairs.
pub type Choices = &'static [(&'static str, &'static str)];

/// A single field of a [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Field name, unique within its schema.
    pub name: &'static str,
    /// Semantic type.
    pub kind: FieldKind,
    /// Human-readable label.
    pub label: &'static str,
    /// Enumerated choices (empty unless `kind` is [`FieldKind::Choice`]).
    pub choices: Choices,
    /// Schema of the related model for relation kinds.
    pub relation: Option<fn() -> &'static Schema>,
}

impl Field {
    /// Creates a field with no choices and no relation.
    pub const fn new(name: &'static str, kind: FieldKind, label: &'static str) -> Self {
        Field {
            name,
            kind,
            label,
            choices: &[],
            relation: None,
        }
    }

    /// Attaches a choice set.
    pub const fn with_choices(self, choices: Choices) -> Self {
        Field { choices, ..self }
    }

    /// Attaches a relation target.
    pub const fn with_relation(self, target: fn() -> &'static Schema) -> Self {
        Field {
            relation: Some(target),
            ..self
        }
    }

    /// Returns the label for a stored choice value.
    pub fn choice_label(&self, value: &str) -> Option<&'static str> {
        self.choices
            .iter()
            .find(|(stored, _)| *stored == value)
            .map(|(_, label)| *label)
    }

    /// Returns the schema this field points at, if it is a relation.
    pub fn related_schema(&self) -> Option<&'static Schema> {
        self.relation.map(|target| target())
    }
}

/// Field metadata for one record type.
#[derive(Debug)]
pub struct Schema {
    /// Model name (snake case).
    pub name: &'static str,
    /// Name of the primary identifier field.
    pub primary_key: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [Field],
}

impl Schema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns all field names in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    /// Returns every field name except the primary identifier.
    pub fn default_columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.name != self.primary_key)
            .map(|field| field.name)
            .collect()
    }

    /// Returns the label of a field, or the name itself if it is unknown.
    pub fn label_for<'a>(&self, name: &'a str) -> &'a str {
        match self.field(name) {
            Some(field) => field.label,
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: Choices = &[("s", "Small"), ("l", "Large")];

    static OWNER: Schema = Schema {
        name: "owner",
        primary_key: "id",
        fields: &[
            Field::new("id", FieldKind::Numeric, "id"),
            Field::new("name", FieldKind::ShortText, "name"),
        ],
    };

    fn owner_schema() -> &'static Schema {
        &OWNER
    }

    static BOX: Schema = Schema {
        name: "box",
        primary_key: "id",
        fields: &[
            Field::new("id", FieldKind::Numeric, "id"),
            Field::new("size", FieldKind::Choice, "size").with_choices(SIZES),
            Field::new("owner", FieldKind::Reference, "owner").with_relation(owner_schema),
        ],
    };

    #[test]
    fn field_lookup() {
        assert_eq!(BOX.field("size").map(|f| f.kind), Some(FieldKind::Choice));
        assert!(BOX.field("missing").is_none());
    }

    #[test]
    fn default_columns_skip_primary_key() {
        assert_eq!(BOX.column_names(), vec!["id", "size", "owner"]);
        assert_eq!(BOX.default_columns(), vec!["size", "owner"]);
    }

    #[test]
    fn choice_labels() {
        let size = BOX.field("size").unwrap();
        assert_eq!(size.choice_label("l"), Some("Large"));
        assert_eq!(size.choice_label("xl"), None);
    }

    #[test]
    fn relation_target() {
        let owner = BOX.field("owner").unwrap();
        assert_eq!(owner.related_schema().map(|s| s.name), Some("owner"));
        assert!(BOX.field("size").unwrap().related_schema().is_none());
    }

    #[test]
    fn kind_names() {
        assert_eq!(FieldKind::ManyRelation.to_string(), "many-relation");
        assert!(FieldKind::Reference.is_relation());
        assert!(FieldKind::LongText.is_text());
        assert!(!FieldKind::Choice.is_text());
    }
}
