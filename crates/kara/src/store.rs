//! Owner-scoped in-memory gift ledger.
//!
//! Every read and write names the owner it acts for. Registries and tags of
//! other owners are reported as missing, never as forbidden.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::color::{is_hex_color, random_hex_color};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    kind_label, CashGift, GiftTag, InKindGift, RegistryId, User, UserProfile, WeddingGiftRegistry,
    GROOM, OTHER_KIND, SIDE_CHOICES,
};

/// Fields of a registry to create.
#[derive(Debug, Clone)]
pub struct NewRegistry {
    pub side: String,
    pub receiver: String,
    pub receptionist: String,
    pub wedding_date: NaiveDate,
    pub updated_at: NaiveDate,
    pub in_kind_gifts_allow: bool,
}

impl NewRegistry {
    /// A groom's side registry with in-kind gifts enabled, updated today.
    pub fn new(
        receiver: impl Into<String>,
        receptionist: impl Into<String>,
        wedding_date: NaiveDate,
    ) -> Self {
        NewRegistry {
            side: GROOM.to_string(),
            receiver: receiver.into(),
            receptionist: receptionist.into(),
            wedding_date,
            updated_at: Utc::now().date_naive(),
            in_kind_gifts_allow: true,
        }
    }
}

/// Fields shared by both gift types.
#[derive(Debug, Clone)]
pub struct NewGift {
    pub name: String,
    pub price: u64,
    pub receipt_date: NaiveDate,
    /// Tag names, matched case-insensitively against the owner's tags.
    pub tags: Vec<String>,
}

impl NewGift {
    pub fn new(name: impl Into<String>, price: u64, receipt_date: NaiveDate) -> Self {
        NewGift {
            name: name.into(),
            price,
            receipt_date,
            tags: Vec::new(),
        }
    }

    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Gift counts and totals of one registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryInsights {
    pub cash_gift_cnt: usize,
    pub cash_gift_total_price: u64,
    pub in_kind_gift_cnt: usize,
    pub in_kind_gift_total_price: u64,
    pub gift_total_price: u64,
}

impl RegistryInsights {
    pub fn gift_cnt(&self) -> usize {
        self.cash_gift_cnt + self.in_kind_gift_cnt
    }
}

/// A registry singled out on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryHighlight {
    pub id: RegistryId,
    pub receiver: String,
    pub wedding_date: NaiveDate,
    pub gift_cnt: usize,
    pub total_price: u64,
}

/// Owner-wide totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub my_registry_cnt: usize,
    pub my_cash_gift_cnt: usize,
    pub my_in_kind_gift_cnt: usize,
    /// Registry with the most gifts of either type.
    pub top_gift_cnt_registry: Option<RegistryHighlight>,
    /// Registry with the highest combined gift value.
    pub top_total_price_registry: Option<RegistryHighlight>,
}

/// The in-memory ledger.
#[derive(Debug, Default)]
pub struct Store {
    users: Vec<Arc<User>>,
    profiles: Vec<UserProfile>,
    registries: Vec<Arc<WeddingGiftRegistry>>,
    tags: Vec<Arc<GiftTag>>,
    cash_gifts: Vec<CashGift>,
    in_kind_gifts: Vec<InKindGift>,
    last_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Registers a user together with an empty profile.
    pub fn add_user(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> StoreResult<Arc<User>> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(StoreError::BlankField { field: "username" });
        }
        if self.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUser(username));
        }

        let user = Arc::new(User {
            id: self.next_id(),
            username,
            email: email.into(),
        });
        self.profiles.push(UserProfile::for_user(user.clone()));
        self.users.push(user.clone());
        info!(username = %user.username, "user added");
        Ok(user)
    }

    pub fn user(&self, username: &str) -> StoreResult<Arc<User>> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }

    pub fn users(&self) -> &[Arc<User>] {
        &self.users
    }

    pub fn profile(&self, username: &str) -> StoreResult<&UserProfile> {
        self.profiles
            .iter()
            .find(|p| p.user.username == username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }

    pub fn profile_mut(&mut self, username: &str) -> StoreResult<&mut UserProfile> {
        self.profiles
            .iter_mut()
            .find(|p| p.user.username == username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }

    // =========================================================================
    // Registries
    // =========================================================================

    pub fn create_registry(
        &mut self,
        owner: &str,
        new: NewRegistry,
    ) -> StoreResult<Arc<WeddingGiftRegistry>> {
        self.insert_registry(owner, RegistryId::new(), new)
    }

    pub(crate) fn insert_registry(
        &mut self,
        owner: &str,
        id: RegistryId,
        new: NewRegistry,
    ) -> StoreResult<Arc<WeddingGiftRegistry>> {
        let owner = self.user(owner)?;
        if self.registries.iter().any(|r| r.id == id) {
            return Err(StoreError::DuplicateRegistry(id.to_string()));
        }
        if !SIDE_CHOICES.iter().any(|(value, _)| *value == new.side) {
            return Err(StoreError::InvalidChoice {
                field: "side",
                value: new.side,
            });
        }
        for (field, value) in [("receiver", &new.receiver), ("receptionist", &new.receptionist)] {
            if value.trim().is_empty() {
                return Err(StoreError::BlankField { field });
            }
        }

        let registry = Arc::new(WeddingGiftRegistry {
            id,
            owner,
            side: new.side,
            receiver: new.receiver,
            receptionist: new.receptionist,
            wedding_date: new.wedding_date,
            updated_at: new.updated_at,
            in_kind_gifts_allow: new.in_kind_gifts_allow,
        });
        debug!(registry = %registry.id, owner = %registry.owner, "registry created");
        self.registries.push(registry.clone());
        Ok(registry)
    }

    /// Looks up a registry belonging to `owner`.
    pub fn registry(&self, owner: &str, id: &RegistryId) -> StoreResult<Arc<WeddingGiftRegistry>> {
        self.registries
            .iter()
            .find(|r| r.id == *id && r.is_owned_by(owner))
            .cloned()
            .ok_or_else(|| StoreError::RegistryNotFound(id.to_string()))
    }

    /// Every registry, across owners. Views scope it with a filter.
    pub fn registries(&self) -> &[Arc<WeddingGiftRegistry>] {
        &self.registries
    }

    /// Registries of `owner`, in creation order.
    pub fn registries_of(&self, owner: &str) -> Vec<Arc<WeddingGiftRegistry>> {
        self.registries
            .iter()
            .filter(|r| r.is_owned_by(owner))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Creates a tag, drawing a random colour when none is given.
    pub fn create_tag<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        owner: &str,
        name: impl Into<String>,
        description: Option<String>,
        hex_color: Option<String>,
    ) -> StoreResult<Arc<GiftTag>> {
        let owner = self.user(owner)?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::BlankField { field: "name" });
        }
        if self.find_tag(&owner.username, &name).is_some() {
            return Err(StoreError::DuplicateTag(name));
        }

        let hex_color = hex_color.unwrap_or_else(|| random_hex_color(rng));
        if !is_hex_color(&hex_color) {
            return Err(StoreError::InvalidHexColor(hex_color));
        }

        let tag = Arc::new(GiftTag {
            id: self.next_id(),
            name,
            owner,
            description,
            hex_color,
        });
        self.tags.push(tag.clone());
        Ok(tag)
    }

    fn find_tag(&self, owner: &str, name: &str) -> Option<&Arc<GiftTag>> {
        let name = name.to_lowercase();
        self.tags
            .iter()
            .find(|t| t.owner.username == owner && t.name.to_lowercase() == name)
    }

    /// Every tag, across owners.
    pub fn tags(&self) -> &[Arc<GiftTag>] {
        &self.tags
    }

    fn resolve_tags(&self, owner: &str, names: &[String]) -> StoreResult<Vec<Arc<GiftTag>>> {
        names
            .iter()
            .map(|name| {
                self.find_tag(owner, name)
                    .cloned()
                    .ok_or_else(|| StoreError::TagNotFound(name.clone()))
            })
            .collect()
    }

    // =========================================================================
    // Gifts
    // =========================================================================

    fn check_gift(new: &NewGift) -> StoreResult<()> {
        if new.name.trim().is_empty() {
            return Err(StoreError::BlankField { field: "name" });
        }
        Ok(())
    }

    pub fn add_cash_gift(
        &mut self,
        owner: &str,
        registry: &RegistryId,
        new: NewGift,
    ) -> StoreResult<&CashGift> {
        let registry = self.registry(owner, registry)?;
        Self::check_gift(&new)?;
        let tags = self.resolve_tags(owner, &new.tags)?;

        let gift = CashGift {
            id: self.next_id(),
            registry,
            name: new.name,
            price: new.price,
            receipt_date: new.receipt_date,
            tags,
        };
        debug!(gift = gift.id, registry = %gift.registry.id, "cash gift recorded");
        self.cash_gifts.push(gift);
        Ok(&self.cash_gifts[self.cash_gifts.len() - 1])
    }

    /// Records an in-kind gift. The registry must track in-kind gifts, and
    /// the `other` kind needs a non-blank detail.
    pub fn add_in_kind_gift(
        &mut self,
        owner: &str,
        registry: &RegistryId,
        new: NewGift,
        kind: impl Into<String>,
        kind_detail: Option<String>,
    ) -> StoreResult<&InKindGift> {
        let registry = self.registry(owner, registry)?;
        if !registry.in_kind_gifts_allow {
            return Err(StoreError::InKindGiftsDisabled(registry.id.to_string()));
        }
        Self::check_gift(&new)?;

        let kind = kind.into();
        if kind_label(&kind).is_none() {
            return Err(StoreError::InvalidChoice {
                field: "kind",
                value: kind,
            });
        }
        let kind_detail = kind_detail.filter(|detail| !detail.trim().is_empty());
        if kind == OTHER_KIND && kind_detail.is_none() {
            return Err(StoreError::MissingKindDetail);
        }
        let tags = self.resolve_tags(owner, &new.tags)?;

        let gift = InKindGift {
            id: self.next_id(),
            registry,
            name: new.name,
            price: new.price,
            receipt_date: new.receipt_date,
            tags,
            kind,
            kind_detail,
        };
        debug!(gift = gift.id, registry = %gift.registry.id, "in-kind gift recorded");
        self.in_kind_gifts.push(gift);
        Ok(&self.in_kind_gifts[self.in_kind_gifts.len() - 1])
    }

    /// Every cash gift, across registries.
    pub fn cash_gifts(&self) -> &[CashGift] {
        &self.cash_gifts
    }

    /// Every in-kind gift, across registries.
    pub fn in_kind_gifts(&self) -> &[InKindGift] {
        &self.in_kind_gifts
    }

    // =========================================================================
    // Insights
    // =========================================================================

    fn insights_for(&self, registry: &WeddingGiftRegistry) -> RegistryInsights {
        let (cash_gift_cnt, cash_gift_total_price) = self
            .cash_gifts
            .iter()
            .filter(|g| g.registry.id == registry.id)
            .fold((0, 0), |(cnt, total), g| (cnt + 1, total + g.price));
        let (in_kind_gift_cnt, in_kind_gift_total_price) = self
            .in_kind_gifts
            .iter()
            .filter(|g| g.registry.id == registry.id)
            .fold((0, 0), |(cnt, total), g| (cnt + 1, total + g.price));

        RegistryInsights {
            cash_gift_cnt,
            cash_gift_total_price,
            in_kind_gift_cnt,
            in_kind_gift_total_price,
            gift_total_price: cash_gift_total_price + in_kind_gift_total_price,
        }
    }

    /// Gift counts and totals of one of `owner`'s registries.
    pub fn registry_insights(&self, owner: &str, id: &RegistryId) -> StoreResult<RegistryInsights> {
        let registry = self.registry(owner, id)?;
        Ok(self.insights_for(&registry))
    }

    /// Owner-wide counts plus the registries with the most gifts and the
    /// highest total. Ties go to the registry created first.
    pub fn dashboard_summary(&self, owner: &str) -> StoreResult<DashboardSummary> {
        self.user(owner)?;
        let registries = self.registries_of(owner);
        let mut highlights = Vec::with_capacity(registries.len());
        let (mut my_cash_gift_cnt, mut my_in_kind_gift_cnt) = (0, 0);
        for registry in &registries {
            let insights = self.insights_for(registry);
            my_cash_gift_cnt += insights.cash_gift_cnt;
            my_in_kind_gift_cnt += insights.in_kind_gift_cnt;
            highlights.push(RegistryHighlight {
                id: registry.id.clone(),
                receiver: registry.receiver.clone(),
                wedding_date: registry.wedding_date,
                gift_cnt: insights.gift_cnt(),
                total_price: insights.gift_total_price,
            });
        }

        Ok(DashboardSummary {
            my_registry_cnt: registries.len(),
            my_cash_gift_cnt,
            my_in_kind_gift_cnt,
            top_gift_cnt_registry: first_max_by(&highlights, |h| h.gift_cnt as u64),
            top_total_price_registry: first_max_by(&highlights, |h| h.total_price),
        })
    }

    /// Gift counts of `owner`'s registries for the registry selector: the
    /// current registry first, the rest by last update.
    pub fn registry_cards(&self, owner: &str, current: Option<&RegistryId>) -> Vec<RegistryCard> {
        let mut cards: Vec<RegistryCard> = self
            .registries_of(owner)
            .iter()
            .map(|registry| self.registry_card(registry, current == Some(&registry.id)))
            .collect();
        cards.sort_by_key(|card| (!card.current, card.updated_at));
        cards
    }

    /// Selector entry for one registry.
    pub fn registry_card(&self, registry: &WeddingGiftRegistry, current: bool) -> RegistryCard {
        let insights = self.insights_for(registry);
        RegistryCard {
            id: registry.id.clone(),
            receiver: registry.receiver.clone(),
            side: registry.side_label().to_string(),
            wedding_date: registry.wedding_date,
            updated_at: registry.updated_at,
            cash_gift_cnt: insights.cash_gift_cnt,
            in_kind_gift_cnt: insights.in_kind_gift_cnt,
            current,
        }
    }
}

/// The first highlight with the largest `key`.
fn first_max_by(
    highlights: &[RegistryHighlight],
    key: impl Fn(&RegistryHighlight) -> u64,
) -> Option<RegistryHighlight> {
    let mut best: Option<&RegistryHighlight> = None;
    for candidate in highlights {
        if best.map_or(true, |b| key(candidate) > key(b)) {
            best = Some(candidate);
        }
    }
    best.cloned()
}

/// Entry of the registry selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryCard {
    pub id: RegistryId,
    pub receiver: String,
    pub side: String,
    pub wedding_date: NaiveDate,
    pub updated_at: NaiveDate,
    pub cash_gift_cnt: usize,
    pub in_kind_gift_cnt: usize,
    pub current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
    }

    fn store() -> (Store, RegistryId) {
        let mut store = Store::new();
        store.add_user("kim", "kim@example.com").unwrap();
        store.add_user("lee", "lee@example.com").unwrap();
        let registry = store
            .create_registry("kim", NewRegistry::new("Alex", "Sam", date(5)))
            .unwrap();
        (store, registry.id.clone())
    }

    #[test]
    fn test_duplicate_user() {
        let (mut store, _) = store();
        assert!(matches!(
            store.add_user("kim", "other@example.com"),
            Err(StoreError::DuplicateUser(_))
        ));
        assert!(!store.profile("kim").unwrap().email_confirmed);
    }

    #[test]
    fn test_registry_is_owner_scoped() {
        let (store, id) = store();
        assert!(store.registry("kim", &id).is_ok());
        let err = store.registry("lee", &id).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.registries_of("lee").len(), 0);
    }

    #[test]
    fn test_registry_validation() {
        let (mut store, _) = store();
        let mut new = NewRegistry::new("Alex", "Sam", date(5));
        new.side = "Neither".into();
        assert!(matches!(
            store.create_registry("kim", new),
            Err(StoreError::InvalidChoice { field: "side", .. })
        ));
        assert!(matches!(
            store.create_registry("kim", NewRegistry::new(" ", "Sam", date(5))),
            Err(StoreError::BlankField { field: "receiver" })
        ));
        assert!(matches!(
            store.create_registry("nobody", NewRegistry::new("Alex", "Sam", date(5))),
            Err(StoreError::UnknownUser(_))
        ));
    }

    #[test]
    fn test_tag_names_unique_per_owner_ignoring_case() {
        let (mut store, _) = store();
        let mut rng = StdRng::seed_from_u64(1);
        let tag = store.create_tag(&mut rng, "kim", "Family", None, None).unwrap();
        assert!(is_hex_color(&tag.hex_color));

        assert!(matches!(
            store.create_tag(&mut rng, "kim", "FAMILY", None, None),
            Err(StoreError::DuplicateTag(_))
        ));
        assert!(store.create_tag(&mut rng, "lee", "family", None, None).is_ok());
    }

    #[test]
    fn test_tag_color_validation() {
        let (mut store, _) = store();
        let mut rng = StdRng::seed_from_u64(1);
        let err = store
            .create_tag(&mut rng, "kim", "Work", None, Some("#abcdef".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "`#abcdef` is not in hex color code format");
        assert!(store
            .create_tag(&mut rng, "kim", "Work", None, Some("#ABCDEF".into()))
            .is_ok());
    }

    #[test]
    fn test_gift_tags_resolve_within_owner() {
        let (mut store, id) = store();
        let mut rng = StdRng::seed_from_u64(1);
        store.create_tag(&mut rng, "lee", "Friends", None, None).unwrap();
        store.create_tag(&mut rng, "kim", "Family", None, None).unwrap();

        let gift = store
            .add_cash_gift("kim", &id, NewGift::new("Jordan", 50000, date(5)).tagged(["family"]))
            .unwrap();
        assert_eq!(gift.tags[0].name, "Family");

        let err = store
            .add_cash_gift("kim", &id, NewGift::new("Casey", 50000, date(5)).tagged(["Friends"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::TagNotFound(name) if name == "Friends"));
    }

    #[test]
    fn test_in_kind_rules() {
        let (mut store, id) = store();
        let gift = || NewGift::new("Jordan", 30000, date(5));

        assert!(matches!(
            store.add_in_kind_gift("kim", &id, gift(), OTHER_KIND, Some("  ".into())),
            Err(StoreError::MissingKindDetail)
        ));
        assert!(matches!(
            store.add_in_kind_gift("kim", &id, gift(), "spaceship", None),
            Err(StoreError::InvalidChoice { field: "kind", .. })
        ));
        let added = store
            .add_in_kind_gift("kim", &id, gift(), OTHER_KIND, Some("Painting".into()))
            .unwrap();
        assert_eq!(added.kind_detail.as_deref(), Some("Painting"));

        let mut closed = NewRegistry::new("Taylor", "Morgan", date(6));
        closed.in_kind_gifts_allow = false;
        let closed = store.create_registry("kim", closed).unwrap().id.clone();
        assert!(matches!(
            store.add_in_kind_gift("kim", &closed, gift(), "decor", None),
            Err(StoreError::InKindGiftsDisabled(_))
        ));
    }

    #[test]
    fn test_registry_insights() {
        let (mut store, id) = store();
        store.add_cash_gift("kim", &id, NewGift::new("A", 10000, date(5))).unwrap();
        store.add_cash_gift("kim", &id, NewGift::new("B", 20000, date(5))).unwrap();
        store
            .add_in_kind_gift("kim", &id, NewGift::new("C", 5000, date(5)), "decor", None)
            .unwrap();

        let insights = store.registry_insights("kim", &id).unwrap();
        assert_eq!(
            insights,
            RegistryInsights {
                cash_gift_cnt: 2,
                cash_gift_total_price: 30000,
                in_kind_gift_cnt: 1,
                in_kind_gift_total_price: 5000,
                gift_total_price: 35000,
            }
        );
        assert!(store.registry_insights("lee", &id).is_err());
    }

    #[test]
    fn test_registry_cards_put_current_first() {
        let (mut store, first) = store();
        let mut later = NewRegistry::new("Jordan", "Casey", date(1));
        later.updated_at = date(1);
        later.side = crate::models::BRIDE.into();
        let second = store.create_registry("kim", later).unwrap().id.clone();

        let cards = store.registry_cards("kim", None);
        assert_eq!(cards[0].id, second);

        let cards = store.registry_cards("kim", Some(&first));
        assert_eq!(cards[0].id, first);
        assert!(cards[0].current);
        assert_eq!(cards[1].side, "Bride's side");
    }
}
