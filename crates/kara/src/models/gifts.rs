//! Gift tags, cash gifts and in-kind gifts.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use kara_macros::Record;
use kara_query::Choices;

use super::accounts::User;
use super::registry::WeddingGiftRegistry;

/// In-kind gift kind that must carry a free-text detail.
pub const OTHER_KIND: &str = "other";

/// Kinds of in-kind gifts.
pub const KIND_CHOICES: Choices = &[
    ("appliance", "Appliance"),
    ("kitchenware", "Kitchenware"),
    ("furniture", "Furniture"),
    ("decor", "Decor"),
    ("bedding", "Bedding"),
    ("food_or_drink", "Food or Drink"),
    ("daily_goods", "Daily Goods"),
    (OTHER_KIND, "Other"),
];

/// Default in-kind gift kind.
pub const DEFAULT_KIND: &str = "appliance";

/// A coloured label an owner attaches to gifts.
#[derive(Debug, Clone, Record)]
#[record(name = "tag")]
pub struct GiftTag {
    #[field(Numeric)]
    pub id: u64,
    #[field(ShortText)]
    pub name: String,
    #[field(Reference, to = User)]
    pub owner: Arc<User>,
    #[field(LongText)]
    pub description: Option<String>,
    #[field(ShortText, label = "hex color")]
    pub hex_color: String,
}

impl fmt::Display for GiftTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Money received as a gift.
#[derive(Debug, Clone, Record)]
pub struct CashGift {
    #[field(Numeric)]
    pub id: u64,
    #[field(Reference, to = WeddingGiftRegistry)]
    pub registry: Arc<WeddingGiftRegistry>,
    /// Name of the guest who gave the gift.
    #[field(ShortText)]
    pub name: String,
    #[field(Numeric)]
    pub price: u64,
    #[field(Date, label = "date of receipt")]
    pub receipt_date: NaiveDate,
    #[field(ManyRelation, to = GiftTag)]
    pub tags: Vec<Arc<GiftTag>>,
}

impl fmt::Display for CashGift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Goods received as a gift, valued at `price`.
#[derive(Debug, Clone, Record)]
pub struct InKindGift {
    #[field(Numeric)]
    pub id: u64,
    #[field(Reference, to = WeddingGiftRegistry)]
    pub registry: Arc<WeddingGiftRegistry>,
    #[field(ShortText)]
    pub name: String,
    #[field(Numeric)]
    pub price: u64,
    #[field(Date, label = "date of receipt")]
    pub receipt_date: NaiveDate,
    #[field(ManyRelation, to = GiftTag)]
    pub tags: Vec<Arc<GiftTag>>,
    #[field(Choice, choices = KIND_CHOICES, label = "Gift Kind")]
    pub kind: String,
    #[field(ShortText, label = "Gift Detail")]
    pub kind_detail: Option<String>,
}

impl InKindGift {
    /// Label of `kind`, falling back to the raw value.
    pub fn kind_label(&self) -> &str {
        kind_label(&self.kind).unwrap_or(&self.kind)
    }

    /// `false` when the kind is "other" but no detail was given.
    pub fn has_required_detail(&self) -> bool {
        self.kind != OTHER_KIND
            || self
                .kind_detail
                .as_deref()
                .is_some_and(|detail| !detail.trim().is_empty())
    }
}

impl fmt::Display for InKindGift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Label of an in-kind gift kind, `None` for unknown kinds.
pub fn kind_label(kind: &str) -> Option<&'static str> {
    KIND_CHOICES
        .iter()
        .find(|(value, _)| *value == kind)
        .map(|(_, label)| *label)
}
