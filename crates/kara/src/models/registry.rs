//! Wedding gift registries.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use kara_macros::Record;
use kara_query::{Choices, ToValue, Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::User;

/// Registry kept by the groom's family.
pub const GROOM: &str = "Groom";
/// Registry kept by the bride's family.
pub const BRIDE: &str = "Bride";

/// Which side of the wedding a registry belongs to.
pub const SIDE_CHOICES: Choices = &[(GROOM, "Groom's side"), (BRIDE, "Bride's side")];

/// Registry identifier: a random UUID held in its hyphenated text form so it
/// can be compared like any other text field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryId(String);

impl RegistryId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        RegistryId::from(Uuid::new_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn uuid(&self) -> Uuid {
        // Only constructed from a valid uuid
        Uuid::parse_str(&self.0).unwrap_or_default()
    }
}

impl Default for RegistryId {
    fn default() -> Self {
        RegistryId::new()
    }
}

impl From<Uuid> for RegistryId {
    fn from(uuid: Uuid) -> Self {
        RegistryId(uuid.hyphenated().to_string())
    }
}

impl FromStr for RegistryId {
    type Err = uuid::Error;

    /// Accepts any uuid spelling and normalises it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(RegistryId::from)
    }
}

impl TryFrom<String> for RegistryId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RegistryId> for String {
    fn from(id: RegistryId) -> Self {
        id.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToValue for RegistryId {
    fn to_value(&self) -> Value<'_> {
        Value::String(&self.0)
    }
}

/// A ledger of gifts received for one wedding.
#[derive(Debug, Clone, Record)]
pub struct WeddingGiftRegistry {
    #[field(ShortText)]
    pub id: RegistryId,
    #[field(Reference, to = User)]
    pub owner: Arc<User>,
    #[field(Choice, choices = SIDE_CHOICES)]
    pub side: String,
    /// The person getting married and receiving the gifts.
    #[field(ShortText)]
    pub receiver: String,
    /// The person who recorded the gift receipts.
    #[field(ShortText)]
    pub receptionist: String,
    #[field(Date)]
    pub wedding_date: NaiveDate,
    #[field(Date, label = "updated at")]
    pub updated_at: NaiveDate,
    /// Whether in-kind gifts are tracked alongside cash gifts.
    #[field(Boolean, label = "include in-kind gifts")]
    pub in_kind_gifts_allow: bool,
}

impl WeddingGiftRegistry {
    /// A groom's side registry with in-kind gifts enabled, updated today.
    pub fn new(
        owner: Arc<User>,
        receiver: impl Into<String>,
        receptionist: impl Into<String>,
        wedding_date: NaiveDate,
    ) -> Self {
        WeddingGiftRegistry {
            id: RegistryId::new(),
            owner,
            side: GROOM.to_string(),
            receiver: receiver.into(),
            receptionist: receptionist.into(),
            wedding_date,
            updated_at: Utc::now().date_naive(),
            in_kind_gifts_allow: true,
        }
    }

    pub fn side_label(&self) -> &str {
        <Self as kara_query::Model>::schema()
            .field(Self::SIDE)
            .and_then(|field| field.choice_label(&self.side))
            .unwrap_or(&self.side)
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner.username == username
    }
}

impl fmt::Display for WeddingGiftRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.receiver, self.wedding_date)
    }
}
