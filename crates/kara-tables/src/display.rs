//! Cell values and formatting helpers.
//!
//! [`display_value`] is the default rendering of one column of a record: it
//! looks up the column's [`FieldKind`] and formats the raw value accordingly.
//! Tables that need richer output (truncated text, grouped numbers, coloured
//! tag chips) override
//! [`TableDefinition::display_for_value`](crate::TableDefinition::display_for_value)
//! and use the helpers in this module.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use kara_query::{Field, FieldKind, Number, Record, Value, ISO_DATE};
use serde::Serialize;

/// Marker appended to truncated text.
pub const TRUNCATION_MARK: &str = " …";

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// No value.
    Empty,
    /// Plain text.
    Text(String),
    /// Several values, e.g. related records.
    List(Vec<String>),
    /// Coloured labels.
    Chips(Vec<Chip>),
}

impl Cell {
    /// Creates a text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text(text.into())
    }

    /// Returns the text of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`Cell::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Renders a raw value without field metadata.
    pub fn from_value(value: &Value<'_>) -> Self {
        match value {
            Value::None => Cell::Empty,
            Value::Records(records) => {
                Cell::List(records.iter().map(|record| record.to_string()).collect())
            }
            other => other
                .to_text()
                .map(|text| Cell::Text(text.into_owned()))
                .unwrap_or(Cell::Empty),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => f.write_str(text),
            Cell::List(items) => f.write_str(&items.join(", ")),
            Cell::Chips(chips) => {
                let texts: Vec<&str> = chips.iter().map(|chip| chip.text.as_str()).collect();
                f.write_str(&texts.join(", "))
            }
        }
    }
}

/// A coloured label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub text: String,
    /// Background colour, `#RRGGBB`.
    pub background: String,
    /// Text colour, a CSS colour name or `#RRGGBB`.
    pub color: String,
}

/// Default rendering of `column` for `record`.
///
/// Unknown columns fall back to the raw value.
pub fn display_value(record: &dyn Record, column: &str) -> Cell {
    let value = record.field_value(column);
    match record.record_schema().field(column) {
        Some(field) => format_field(field, &value),
        None => Cell::from_value(&value),
    }
}

/// Formats a value according to its field kind.
pub fn format_field(field: &Field, value: &Value<'_>) -> Cell {
    if value.is_none() {
        return Cell::Empty;
    }
    match field.kind {
        FieldKind::Choice => match value.to_text() {
            Some(stored) => Cell::text(
                field
                    .choice_label(&stored)
                    .map(str::to_string)
                    .unwrap_or_else(|| stored.into_owned()),
            ),
            None => Cell::Empty,
        },
        FieldKind::Date => match value.as_date() {
            Some(date) => Cell::text(date.format(ISO_DATE).to_string()),
            None => Cell::from_value(value),
        },
        FieldKind::Boolean => match value.as_bool() {
            Some(true) => Cell::text("Yes"),
            Some(false) => Cell::text("No"),
            None => Cell::from_value(value),
        },
        FieldKind::ManyRelation => Cell::List(
            value
                .as_records()
                .iter()
                .map(|record| record.to_string())
                .collect(),
        ),
        FieldKind::ShortText | FieldKind::LongText | FieldKind::Numeric | FieldKind::Reference => {
            Cell::from_value(value)
        }
    }
}

/// Truncates `text` to at most `words` words, appending ` …` when cut.
pub fn truncate_words(text: &str, words: usize) -> String {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() <= words {
        return text.to_string();
    }
    format!("{}{TRUNCATION_MARK}", parts[..words].join(" "))
}

/// Formats a number with `,` thousand separators.
pub fn intcomma(number: impl Into<Number>) -> String {
    let rendered = number.into().to_string();
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

const MONTHS: [&str; 12] = [
    "Jan.", "Feb.", "March", "April", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
    "Dec.",
];

/// Long date form, e.g. `Dec. 31, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        MONTHS[date.month0() as usize],
        date.day(),
        date.year()
    )
}
