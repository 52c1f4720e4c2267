//! Table definitions for gifts and tags.

use std::sync::Arc;

use kara_query::{FieldKind, Record};
use kara_tables::{
    format_date, format_field, intcomma, truncate_words, Cell, Chip, TableDefinition,
};

use crate::color::contrast_color;
use crate::models::{CashGift, GiftTag, InKindGift};

/// Words kept from text columns of gift tables.
pub const GIFT_TEXT_WORDS: usize = 8;

/// Help text of the gift search form.
pub const GIFT_SEARCH_HELP: &str =
    "Looking for someone? Enter a name to find records that match it exactly.";

const GIFT_SEARCH_FIELDS: &[&str] = &["name__iexact"];
const GIFT_ORDERING: &[&str] = &["price", "receipt_date"];
const COMMA_COLUMNS: &[&str] = &["price"];
const TAG_COLUMN: &str = "tags";

/// Gift table rendering of `column`.
///
/// Choices show their label, text is cut to [`GIFT_TEXT_WORDS`] words,
/// dates use the long form, prices get thousand separators and tags become
/// coloured chips.
pub fn gift_cell(record: &dyn Record, column: &str) -> Cell {
    let value = record.field_value(column);
    let Some(field) = record.record_schema().field(column) else {
        return Cell::from_value(&value);
    };
    if value.is_none() {
        return Cell::Empty;
    }

    match field.kind {
        FieldKind::ShortText | FieldKind::LongText => match value.to_text() {
            Some(text) => Cell::text(truncate_words(&text, GIFT_TEXT_WORDS)),
            None => Cell::Empty,
        },
        FieldKind::Date => match value.as_date() {
            Some(date) => Cell::text(format_date(date)),
            None => format_field(field, &value),
        },
        FieldKind::Numeric if COMMA_COLUMNS.contains(&column) => match value.as_number() {
            Some(number) => Cell::text(intcomma(number)),
            None => format_field(field, &value),
        },
        FieldKind::ManyRelation if column == TAG_COLUMN => {
            Cell::Chips(value.as_records().into_iter().map(tag_chip).collect())
        }
        _ => format_field(field, &value),
    }
}

fn tag_chip(tag: &dyn Record) -> Chip {
    let background = tag
        .field_value(GiftTag::HEX_COLOR)
        .to_text()
        .map(|color| color.into_owned())
        .unwrap_or_default();
    Chip {
        text: tag.to_string(),
        color: contrast_color(&background).to_string(),
        background,
    }
}

/// Cash gifts of one registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashGiftTable {
    per_page: Option<usize>,
}

impl CashGiftTable {
    pub fn new(per_page: Option<usize>) -> Self {
        CashGiftTable { per_page }
    }
}

impl TableDefinition for CashGiftTable {
    type Model = CashGift;

    fn columns(&self) -> Vec<&'static str> {
        vec![
            CashGift::NAME,
            CashGift::PRICE,
            CashGift::RECEIPT_DATE,
            CashGift::TAGS,
        ]
    }

    fn search_fields(&self) -> Vec<&'static str> {
        GIFT_SEARCH_FIELDS.to_vec()
    }

    fn ordering(&self) -> Vec<&'static str> {
        GIFT_ORDERING.to_vec()
    }

    fn per_page(&self) -> Option<usize> {
        self.per_page
    }

    fn search_help_text(&self) -> Option<String> {
        Some(GIFT_SEARCH_HELP.to_string())
    }

    fn display_for_value(&self, record: &CashGift, column: &str) -> Cell {
        gift_cell(record, column)
    }
}

/// In-kind gifts of one registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct InKindGiftTable {
    per_page: Option<usize>,
}

impl InKindGiftTable {
    pub fn new(per_page: Option<usize>) -> Self {
        InKindGiftTable { per_page }
    }
}

impl TableDefinition for InKindGiftTable {
    type Model = InKindGift;

    fn columns(&self) -> Vec<&'static str> {
        vec![
            InKindGift::NAME,
            InKindGift::KIND,
            InKindGift::KIND_DETAIL,
            InKindGift::PRICE,
            InKindGift::RECEIPT_DATE,
            InKindGift::TAGS,
        ]
    }

    fn search_fields(&self) -> Vec<&'static str> {
        GIFT_SEARCH_FIELDS.to_vec()
    }

    fn ordering(&self) -> Vec<&'static str> {
        GIFT_ORDERING.to_vec()
    }

    fn per_page(&self) -> Option<usize> {
        self.per_page
    }

    fn search_help_text(&self) -> Option<String> {
        Some(GIFT_SEARCH_HELP.to_string())
    }

    fn display_for_value(&self, record: &InKindGift, column: &str) -> Cell {
        gift_cell(record, column)
    }
}

/// An owner's tags, with default rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiftTagTable;

impl TableDefinition for GiftTagTable {
    type Model = Arc<GiftTag>;

    fn columns(&self) -> Vec<&'static str> {
        vec![GiftTag::NAME, GiftTag::DESCRIPTION, GiftTag::HEX_COLOR]
    }

    fn search_fields(&self) -> Vec<&'static str> {
        vec!["name"]
    }

    fn ordering(&self) -> Vec<&'static str> {
        vec![GiftTag::NAME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, WeddingGiftRegistry};
    use chrono::NaiveDate;

    fn owner() -> Arc<User> {
        Arc::new(User {
            id: 1,
            username: "kim".into(),
            email: "kim@example.com".into(),
        })
    }

    fn tag(name: &str, hex_color: &str) -> Arc<GiftTag> {
        Arc::new(GiftTag {
            id: 1,
            name: name.into(),
            owner: owner(),
            description: None,
            hex_color: hex_color.into(),
        })
    }

    fn gift(kind: &str, detail: Option<&str>) -> InKindGift {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        InKindGift {
            id: 1,
            registry: Arc::new(WeddingGiftRegistry::new(owner(), "Alex", "Sam", date)),
            name: "Jordan".into(),
            price: 1234567,
            receipt_date: date,
            tags: vec![tag("Family", "#FFFFFF"), tag("Work", "#000000")],
            kind: kind.into(),
            kind_detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn test_gift_cells() {
        let gift = gift(
            "food_or_drink",
            Some("a very long detail that keeps going past eight words"),
        );
        let table = InKindGiftTable::default();
        let cells: Vec<Cell> = table
            .columns()
            .into_iter()
            .map(|column| table.display_for_value(&gift, column))
            .collect();

        assert_eq!(cells[0], Cell::text("Jordan"));
        assert_eq!(cells[1], Cell::text("Food or Drink"));
        assert_eq!(
            cells[2],
            Cell::text("a very long detail that keeps going past …")
        );
        assert_eq!(cells[3], Cell::text("1,234,567"));
        assert_eq!(cells[4], Cell::text("Dec. 31, 2024"));
        assert_eq!(
            cells[5],
            Cell::Chips(vec![
                Chip {
                    text: "Family".into(),
                    background: "#FFFFFF".into(),
                    color: "black".into(),
                },
                Chip {
                    text: "Work".into(),
                    background: "#000000".into(),
                    color: "white".into(),
                },
            ])
        );
    }

    #[test]
    fn test_missing_detail_is_empty() {
        let gift = gift("appliance", None);
        assert_eq!(
            InKindGiftTable::default().display_for_value(&gift, "kind_detail"),
            Cell::Empty
        );
    }

    #[test]
    fn test_table_declarations() {
        let cash = CashGiftTable::new(Some(5));
        assert_eq!(cash.columns(), ["name", "price", "receipt_date", "tags"]);
        assert_eq!(cash.search_fields(), ["name__iexact"]);
        assert_eq!(cash.ordering(), ["price", "receipt_date"]);
        assert_eq!(cash.per_page(), Some(5));
        assert_eq!(cash.search_help_text().as_deref(), Some(GIFT_SEARCH_HELP));

        assert_eq!(GiftTagTable.columns(), ["name", "description", "hex_color"]);
    }
}
