//! Derived records, relation traversal and collection behaviour.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use kara_macros::Record;
use kara_query::{
    Choices, Collection, FieldKind, LookupPath, MemoryCollection, Model, OrderBy, Query,
    QueryError, Record, Value,
};

const SIZES: Choices = &[("s", "Small"), ("l", "Large")];

#[derive(Record)]
struct Owner {
    #[field(Numeric)]
    id: u64,
    #[field(ShortText)]
    username: String,
}

#[derive(Record)]
#[record(name = "label")]
struct Tag {
    #[field(Numeric)]
    id: u64,
    #[field(ShortText)]
    name: String,
}

#[derive(Record)]
struct Parcel {
    #[field(Numeric)]
    id: u64,
    #[field(ShortText, label = "parcel name")]
    name: String,
    #[field(Choice, choices = SIZES)]
    size: String,
    #[field(Numeric)]
    weight: f64,
    #[field(Date, rename = "sent")]
    sent_on: NaiveDate,
    #[field(Boolean)]
    fragile: bool,
    #[field(LongText)]
    note: Option<String>,
    #[field(Reference, to = Owner)]
    owner: Arc<Owner>,
    #[field(ManyRelation, to = Tag)]
    tags: Vec<Arc<Tag>>,
    #[allow(dead_code)]
    checksum: u32,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixture() -> Vec<Parcel> {
    let kim = Arc::new(Owner {
        id: 1,
        username: "kim".into(),
    });
    let lee = Arc::new(Owner {
        id: 2,
        username: "lee".into(),
    });
    let glass = Arc::new(Tag {
        id: 1,
        name: "Glass".into(),
    });
    let gift = Arc::new(Tag {
        id: 2,
        name: "Gift".into(),
    });

    vec![
        Parcel {
            id: 1,
            name: "Vase".into(),
            size: "l".into(),
            weight: 2.5,
            sent_on: date(2024, 3, 1),
            fragile: true,
            note: Some("handle with care".into()),
            owner: kim.clone(),
            tags: vec![glass.clone(), gift.clone()],
            checksum: 0,
        },
        Parcel {
            id: 2,
            name: "Books".into(),
            size: "l".into(),
            weight: 7.0,
            sent_on: date(2024, 1, 15),
            fragile: false,
            note: None,
            owner: lee.clone(),
            tags: vec![gift],
            checksum: 0,
        },
        Parcel {
            id: 3,
            name: "Cups".into(),
            size: "s".into(),
            weight: 1.0,
            sent_on: date(2024, 2, 10),
            fragile: true,
            note: None,
            owner: kim,
            tags: vec![glass],
            checksum: 0,
        },
        Parcel {
            id: 4,
            name: "Socks".into(),
            size: "s".into(),
            weight: 0.2,
            sent_on: date(2024, 3, 20),
            fragile: false,
            note: None,
            owner: lee,
            tags: Vec::new(),
            checksum: 0,
        },
    ]
}

fn names(parcels: &[&Parcel]) -> Vec<String> {
    parcels.iter().map(|p| p.name.clone()).collect()
}

#[test]
fn derived_schema_describes_fields() {
    let schema = Parcel::schema();
    assert_eq!(schema.name, "parcel");
    assert_eq!(schema.primary_key, "id");
    assert_eq!(
        schema.column_names(),
        vec!["id", "name", "size", "weight", "sent", "fragile", "note", "owner", "tags"]
    );
    assert_eq!(schema.label_for("name"), "parcel name");
    assert_eq!(schema.label_for("sent"), "sent");

    let size = schema.field("size").unwrap();
    assert_eq!(size.kind, FieldKind::Choice);
    assert_eq!(size.choice_label("s"), Some("Small"));

    let tags = schema.field("tags").unwrap();
    assert_eq!(tags.related_schema().map(|s| s.name), Some("label"));
    assert_eq!(Parcel::SENT, "sent");
    assert_eq!(Parcel::TAGS, "tags");
}

#[test]
fn derived_field_values() {
    let parcels = fixture();
    let vase = &parcels[0];

    assert_eq!(vase.field_value("name"), Value::String("Vase"));
    assert_eq!(vase.field_value("sent"), Value::Date(date(2024, 3, 1)));
    assert_eq!(vase.field_value("fragile"), Value::Bool(true));
    assert_eq!(vase.field_value("checksum"), Value::None);
    assert_eq!(vase.field_value("owner").to_text().as_deref(), Some("kim"));
    assert_eq!(vase.field_value("tags").as_records().len(), 2);
    assert!(parcels[1].field_value("note").is_none());
}

#[test]
fn lookups_follow_relations() {
    let parcels = fixture();
    let found = MemoryCollection::new(&parcels)
        .filter(Query::new().and_exact("owner__username", "kim"))
        .unwrap()
        .fetch();
    assert_eq!(names(&found), vec!["Vase", "Cups"]);

    let dotted = MemoryCollection::new(&parcels)
        .filter(Query::new().and_exact("owner.id", 2u64))
        .unwrap()
        .fetch();
    assert_eq!(names(&dotted), vec!["Books", "Socks"]);
}

#[test]
fn many_relations_fan_out() {
    let parcels = fixture();

    let glass = MemoryCollection::new(&parcels)
        .filter(Query::new().and_iexact("tags__name", "glass"))
        .unwrap()
        .fetch();
    assert_eq!(names(&glass), vec!["Vase", "Cups"]);

    // String operators on a relation compare its display text
    let gift = MemoryCollection::new(&parcels)
        .filter(Query::new().and_icontains("tags", "gif"))
        .unwrap()
        .fetch();
    assert_eq!(names(&gift), vec!["Vase", "Books"]);

    let untagged = MemoryCollection::new(&parcels)
        .filter(Query::new().and_isnull("tags", true))
        .unwrap()
        .fetch();
    assert_eq!(names(&untagged), vec!["Socks"]);
}

#[test]
fn typed_comparisons() {
    let parcels = fixture();

    let heavy = MemoryCollection::new(&parcels)
        .filter(Query::new().and_gte("weight", 2.5))
        .unwrap();
    assert_eq!(heavy.count(), 2);

    let early = MemoryCollection::new(&parcels)
        .filter(Query::new().and_lt("sent", "2024-02-15"))
        .unwrap()
        .fetch();
    assert_eq!(names(&early), vec!["Books", "Cups"]);
}

#[test]
fn orderings_cross_relations_and_keep_ties_stable() {
    let parcels = fixture();
    let sorted = MemoryCollection::new(&parcels)
        .order_by(vec![OrderBy::desc("owner__username"), OrderBy::asc("sent")])
        .fetch();
    assert_eq!(names(&sorted), vec!["Books", "Socks", "Cups", "Vase"]);

    let by_size = MemoryCollection::new(&parcels)
        .order_by(vec![OrderBy::asc("size")])
        .fetch();
    assert_eq!(names(&by_size), vec!["Vase", "Books", "Cups", "Socks"]);
}

#[test]
fn missing_values_sort_last() {
    let parcels = fixture();
    let sorted = MemoryCollection::new(&parcels)
        .order_by(vec![OrderBy::desc("note")])
        .fetch();
    assert_eq!(sorted[0].name, "Vase");
}

#[test]
fn lookup_errors_name_the_model() {
    let err = LookupPath::new("owner__email").resolve(Parcel::schema()).unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { model: "owner", .. }));

    let err = LookupPath::new("weight__grams__gt").resolve(Parcel::schema()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`parcel.weight` is not a relation and cannot be followed by `grams`"
    );
}
