//! Kara - wedding gift registry bookkeeping.
//!
//! Owners keep registries of the gifts received at a wedding, split between
//! cash gifts and in-kind gifts, and label gifts with coloured tags. Every
//! listing is a [`kara_tables`] table: searchable by name, sortable by price
//! and receipt date, paginated.
//!
//! ```text
//! Fixture ──► Store ──► views ──► JSON
//!                         │
//!                         └── tables (CashGiftTable, InKindGiftTable, GiftTagTable)
//! ```
//!
//! # Views
//!
//! | View | Shows |
//! |------|-------|
//! | [`gift_table_view`] | one registry's cash or in-kind gifts |
//! | [`registry_detail_view`] | a registry with its gift counts and totals |
//! | [`dashboard_view`] | owner-wide totals plus a page of registries |
//! | [`tag_table_view`] | the owner's tags |
//!
//! Views are scoped to an owner: another owner's registry is reported as
//! [`ViewError::NotFound`], the same as a page past the end.

pub mod color;
pub mod error;
pub mod fixture;
pub mod models;
pub mod settings;
pub mod store;
pub mod tables;
pub mod views;

pub use error::{StoreError, StoreResult, ViewError, ViewResult};
pub use fixture::Fixture;
pub use settings::AppSettings;
pub use store::{DashboardSummary, NewGift, NewRegistry, RegistryCard, RegistryInsights, Store};
pub use tables::{CashGiftTable, GiftTagTable, InKindGiftTable};
pub use views::{
    dashboard_view, gift_table_view, registry_detail_view, tag_table_view, DashboardView,
    GiftTableView, GiftType, RegistryDetailView,
};
