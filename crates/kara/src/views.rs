//! Request-level views.
//!
//! Each view takes the store, the requesting owner and the request's query
//! parameters, and returns a serializable value for the rendering layer.
//! Tables are rebuilt on every call.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use kara_query::{Collection, MemoryCollection, OrderBy, Query};
use kara_tables::{
    Pagination, PaginationSummary, QueryParams, Table, TableDefinition, TableError, TablePage,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::models::RegistryId;
use crate::settings::AppSettings;
use crate::store::{DashboardSummary, RegistryCard, RegistryInsights, Store};
use crate::tables::{CashGiftTable, GiftTagTable, InKindGiftTable};

/// Query parameter selecting the gift table.
pub const GIFT_TYPE_VAR: &str = "gift_type";

/// Which gift table to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GiftType {
    #[default]
    Cash,
    #[value(alias = "in_kind")]
    InKind,
}

impl GiftType {
    pub fn as_str(self) -> &'static str {
        match self {
            GiftType::Cash => "cash",
            GiftType::InKind => "in_kind",
        }
    }

    /// Reads the gift type parameter, defaulting to cash gifts.
    pub fn from_params(params: &QueryParams) -> ViewResult<Self> {
        match params.get(GIFT_TYPE_VAR).filter(|value| !value.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(GiftType::default()),
        }
    }
}

impl FromStr for GiftType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(GiftType::Cash),
            "in_kind" | "in-kind" => Ok(GiftType::InKind),
            other => Err(ViewError::UnknownGiftType(other.to_string())),
        }
    }
}

impl fmt::Display for GiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Searches, sorts and paginates `items` matching `base`, newest first.
fn render_table<D>(
    definition: &D,
    items: &[D::Model],
    base: Query,
    params: &QueryParams,
    settings: &AppSettings,
) -> ViewResult<TablePage>
where
    D: TableDefinition,
{
    let collection = MemoryCollection::new(items)
        .filter(base)
        .map_err(TableError::from)?
        .order_by(vec![OrderBy::desc("id")]);
    let table = Table::new(definition, collection, params, &settings.table)?;
    Ok(table.page()?)
}

/// A registry's gift table.
#[derive(Debug, Clone, Serialize)]
pub struct GiftTableView {
    pub gift_type: GiftType,
    pub current_registry: RegistryId,
    /// Registry selector, current registry first.
    pub registries: Vec<RegistryCard>,
    pub table: TablePage,
}

/// Lists the `gift_type` gifts of one of `owner`'s registries.
///
/// A page outside the result set is reported as [`ViewError::NotFound`].
pub fn gift_table_view(
    store: &Store,
    owner: &str,
    registry: &RegistryId,
    gift_type: GiftType,
    params: &QueryParams,
    settings: &AppSettings,
) -> ViewResult<GiftTableView> {
    let registry = store.registry(owner, registry)?;
    debug!(registry = %registry.id, %gift_type, query = %params, "gift table requested");

    let base = Query::new().and_exact("registry__id", registry.id.as_str());
    let per_page = Some(settings.gift_table_per_page);
    let table = match gift_type {
        GiftType::Cash => render_table(
            &CashGiftTable::new(per_page),
            store.cash_gifts(),
            base,
            params,
            settings,
        )?,
        GiftType::InKind => render_table(
            &InKindGiftTable::new(per_page),
            store.in_kind_gifts(),
            base,
            params,
            settings,
        )?,
    };

    Ok(GiftTableView {
        gift_type,
        current_registry: registry.id.clone(),
        registries: store.registry_cards(owner, Some(&registry.id)),
        table,
    })
}

/// An owner's tags.
pub fn tag_table_view(
    store: &Store,
    owner: &str,
    params: &QueryParams,
    settings: &AppSettings,
) -> ViewResult<TablePage> {
    store.user(owner)?;
    let base = Query::new().and_exact("owner__username", owner);
    render_table(&GiftTagTable, store.tags(), base, params, settings)
}

/// Registry fields shown on the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryDetail {
    pub id: RegistryId,
    pub owner: String,
    pub side: String,
    pub side_label: String,
    pub receiver: String,
    pub receptionist: String,
    pub wedding_date: NaiveDate,
    pub updated_at: NaiveDate,
    pub in_kind_gifts_allow: bool,
}

/// The registry detail page.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryDetailView {
    pub registry: RegistryDetail,
    pub insights: RegistryInsights,
    pub registries: Vec<RegistryCard>,
}

pub fn registry_detail_view(
    store: &Store,
    owner: &str,
    registry: &RegistryId,
) -> ViewResult<RegistryDetailView> {
    let registry = store.registry(owner, registry)?;
    let insights = store.registry_insights(owner, &registry.id)?;

    Ok(RegistryDetailView {
        registry: RegistryDetail {
            id: registry.id.clone(),
            owner: registry.owner.username.clone(),
            side: registry.side.clone(),
            side_label: registry.side_label().to_string(),
            receiver: registry.receiver.clone(),
            receptionist: registry.receptionist.clone(),
            wedding_date: registry.wedding_date,
            updated_at: registry.updated_at,
            in_kind_gifts_allow: registry.in_kind_gifts_allow,
        },
        insights,
        registries: store.registry_cards(owner, Some(&registry.id)),
    })
}

/// The owner's dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    /// Registries of the requested page.
    pub registries: Vec<RegistryCard>,
    pub pagination: PaginationSummary,
}

/// Owner-wide totals plus a page of registries,
/// [`AppSettings::dashboard_per_page`] at a time.
pub fn dashboard_view(
    store: &Store,
    owner: &str,
    params: &QueryParams,
    settings: &AppSettings,
) -> ViewResult<DashboardView> {
    let summary = store.dashboard_summary(owner)?;

    let registries = MemoryCollection::new(store.registries())
        .filter(Query::new().and_exact("owner__username", owner))
        .map_err(TableError::from)?;
    let pagination = Pagination::new(
        registries,
        params,
        &settings.table,
        settings.dashboard_per_page,
    );
    let page = pagination
        .get_objects()?
        .into_iter()
        .map(|registry| store.registry_card(registry, false))
        .collect();
    debug!(
        owner,
        registries = pagination.result_count(),
        page = pagination.page_num(),
        "dashboard built"
    );

    Ok(DashboardView {
        summary,
        registries: page,
        pagination: pagination.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gift_type_parsing() {
        assert_eq!(
            GiftType::from_params(&QueryParams::new()).unwrap(),
            GiftType::Cash
        );
        assert_eq!(
            GiftType::from_params(&QueryParams::parse("gift_type=in_kind")).unwrap(),
            GiftType::InKind
        );
        assert_eq!("in-kind".parse::<GiftType>().unwrap(), GiftType::InKind);
        assert!(matches!(
            GiftType::from_params(&QueryParams::parse("gift_type=voucher")),
            Err(ViewError::UnknownGiftType(_))
        ));
    }

    #[test]
    fn test_gift_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(GiftType::InKind).unwrap(),
            serde_json::json!("in_kind")
        );
    }
}
