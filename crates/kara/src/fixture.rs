//! JSON fixtures for seeding a [`Store`].
//!
//! ```json
//! {
//!   "users": [{ "username": "kim", "email": "kim@example.com" }],
//!   "tags": [{ "owner": "kim", "name": "Family", "hex_color": "#F4A261" }],
//!   "registries": [{
//!     "owner": "kim",
//!     "receiver": "Alex",
//!     "receptionist": "Sam",
//!     "wedding_date": "2024-10-05",
//!     "cash_gifts": [{ "name": "Jordan", "price": 50000, "receipt_date": "2024-10-05" }]
//!   }]
//! }
//! ```
//!
//! Records are validated exactly as if they were entered one by one.

use std::path::Path;

use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::models::{RegistryId, DEFAULT_KIND, GROOM};
use crate::store::{NewGift, NewRegistry, Store};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub tags: Vec<TagFixture>,
    #[serde(default)]
    pub registries: Vec<RegistryFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserFixture {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email_confirmed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagFixture {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Drawn at random when absent.
    #[serde(default)]
    pub hex_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryFixture {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<RegistryId>,
    pub owner: String,
    #[serde(default = "default_side")]
    pub side: String,
    pub receiver: String,
    pub receptionist: String,
    pub wedding_date: NaiveDate,
    /// Defaults to the wedding date.
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub in_kind_gifts_allow: bool,
    #[serde(default)]
    pub cash_gifts: Vec<GiftFixture>,
    #[serde(default)]
    pub in_kind_gifts: Vec<InKindGiftFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GiftFixture {
    pub name: String,
    pub price: u64,
    pub receipt_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InKindGiftFixture {
    pub name: String,
    pub price: u64,
    pub receipt_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub kind_detail: Option<String>,
}

fn default_side() -> String {
    GROOM.to_string()
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

fn default_true() -> bool {
    true
}

impl From<GiftFixture> for NewGift {
    fn from(gift: GiftFixture) -> Self {
        NewGift::new(gift.name, gift.price, gift.receipt_date).tagged(gift.tags)
    }
}

impl InKindGiftFixture {
    fn split(self) -> (NewGift, String, Option<String>) {
        let gift = NewGift::new(self.name, self.price, self.receipt_date).tagged(self.tags);
        (gift, self.kind, self.kind_detail)
    }
}

impl Fixture {
    pub fn from_json(content: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Builds a store holding every record of the fixture.
    pub fn into_store<R: Rng + ?Sized>(self, rng: &mut R) -> StoreResult<Store> {
        let mut store = Store::new();

        for user in self.users {
            store.add_user(user.username.clone(), user.email)?;
            let profile = store.profile_mut(&user.username)?;
            profile.bio = user.bio;
            profile.email_confirmed = user.email_confirmed;
        }

        for tag in self.tags {
            store.create_tag(rng, &tag.owner, tag.name, tag.description, tag.hex_color)?;
        }

        for registry in self.registries {
            let owner = registry.owner;
            let new = NewRegistry {
                side: registry.side,
                receiver: registry.receiver,
                receptionist: registry.receptionist,
                wedding_date: registry.wedding_date,
                updated_at: registry.updated_at.unwrap_or(registry.wedding_date),
                in_kind_gifts_allow: registry.in_kind_gifts_allow,
            };
            let id = registry.id.unwrap_or_default();
            let id = store.insert_registry(&owner, id, new)?.id.clone();

            for gift in registry.cash_gifts {
                store.add_cash_gift(&owner, &id, gift.into())?;
            }
            for gift in registry.in_kind_gifts {
                let (gift, kind, kind_detail) = gift.split();
                store.add_in_kind_gift(&owner, &id, gift, kind, kind_detail)?;
            }
        }

        info!(
            users = store.users().len(),
            registries = store.registries().len(),
            cash_gifts = store.cash_gifts().len(),
            in_kind_gifts = store.in_kind_gifts().len(),
            "fixture loaded"
        );
        Ok(store)
    }
}
