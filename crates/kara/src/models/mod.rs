//! Record types of the gift ledger.
//!
//! Every model derives [`kara_macros::Record`], so it can be filtered, sorted
//! and listed by the table engine. Relations are shared with [`Arc`]:
//! a gift points at its registry and tags, a registry at its owner.
//!
//! [`Arc`]: std::sync::Arc

mod accounts;
mod gifts;
mod registry;

pub use accounts::{
    User, UserProfile, VerificationCode, VerificationError, CODE_LENGTH, CODE_TTL_MINUTES,
};
pub use gifts::{
    kind_label, CashGift, GiftTag, InKindGift, DEFAULT_KIND, KIND_CHOICES, OTHER_KIND,
};
pub use registry::{RegistryId, WeddingGiftRegistry, BRIDE, GROOM, SIDE_CHOICES};
