//! Table orchestration.
//!
//! A [`Table`] is built once per request from a [`TableDefinition`], a base
//! collection and the request's query parameters. Construction always runs
//! search, then sort, then pagination; records are only materialised by
//! [`Table::objects`] and [`Table::rows`].

use std::borrow::Borrow;

use kara_query::{Collection, Model, Schema};
use serde::Serialize;
use tracing::debug;

use crate::display::{display_value, Cell};
use crate::error::Result;
use crate::pagination::{Pagination, PaginationSummary};
use crate::params::QueryParams;
use crate::search::{apply_search, SearchForm};
use crate::settings::TableSettings;
use crate::sort::{Header, Sorter};

/// Declarative description of a table over one model.
///
/// Every method has a default, so the smallest table is an empty `impl`
/// naming the model:
///
/// ```
/// # use std::fmt;
/// # use kara_query::{Field, FieldKind, Model, Record, Schema, ToValue, Value};
/// # struct Fruit { name: String }
/// # static FRUIT: Schema = Schema {
/// #     name: "fruit",
/// #     primary_key: "name",
/// #     fields: &[Field::new("name", FieldKind::ShortText, "name")],
/// # };
/// # impl fmt::Display for Fruit {
/// #     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
/// # }
/// # impl Record for Fruit {
/// #     fn record_schema(&self) -> &'static Schema { &FRUIT }
/// #     fn field_value(&self, field: &str) -> Value<'_> {
/// #         match field { "name" => self.name.to_value(), _ => Value::None }
/// #     }
/// # }
/// # impl Model for Fruit { fn schema() -> &'static Schema { &FRUIT } }
/// use kara_tables::TableDefinition;
///
/// struct FruitTable;
///
/// impl TableDefinition for FruitTable {
///     type Model = Fruit;
///
///     fn search_fields(&self) -> Vec<&'static str> {
///         vec!["name"]
///     }
/// }
/// ```
pub trait TableDefinition {
    /// The record type listed by this table.
    type Model: Model;

    /// Displayed columns, in order. Defaults to every field except the
    /// primary key.
    fn columns(&self) -> Vec<&'static str> {
        Self::Model::schema().default_columns()
    }

    /// Lookups searched by the search parameter.
    fn search_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Columns that may be sorted.
    fn ordering(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Page size. `None` uses the settings default.
    fn per_page(&self) -> Option<usize> {
        None
    }

    /// Help text shown next to the search input.
    fn search_help_text(&self) -> Option<String> {
        None
    }

    /// Renders `column` of `record`.
    fn display_for_value(&self, record: &Self::Model, column: &str) -> Cell {
        display_value(record, column)
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Primary key of the record, as text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub cells: Vec<Cell>,
}

/// A table bound to one request.
#[derive(Debug)]
pub struct Table<'d, D: TableDefinition, C> {
    definition: &'d D,
    columns: Vec<&'static str>,
    sorter: Sorter,
    pagination: Pagination<C>,
    search_form: SearchForm,
}

impl<'d, D, C> Table<'d, D, C>
where
    D: TableDefinition,
    C: Collection + Clone,
    C::Item: Borrow<D::Model>,
{
    /// Searches, sorts and paginates `collection` for a request carrying
    /// `params`.
    ///
    /// Fails if a declared search lookup is invalid. An out-of-range page is
    /// only reported by [`Table::objects`].
    pub fn new(
        definition: &'d D,
        collection: C,
        params: &QueryParams,
        settings: &TableSettings,
    ) -> Result<Self> {
        let schema = D::Model::schema();
        let columns = definition.columns();
        let search_value = params.get(&settings.search_var).unwrap_or_default();

        debug!(model = schema.name, search = search_value, "building table");

        let searched = apply_search(collection, &definition.search_fields(), search_value)?;

        let sorter = Sorter::new(
            schema,
            &columns,
            &definition.ordering(),
            params,
            &settings.order_var,
        )
        .resetting_page(&settings.page_var);
        let sorted = sorter.apply(searched);

        let per_page = definition.per_page().unwrap_or(settings.per_page);
        let pagination = Pagination::new(sorted, params, settings, per_page);

        let mut search_form = SearchForm::new(settings.search_var.clone(), search_value);
        search_form.help_text = definition.search_help_text();

        Ok(Table {
            definition,
            columns,
            sorter,
            pagination,
            search_form,
        })
    }

    /// Schema of the listed model.
    pub fn schema(&self) -> &'static Schema {
        D::Model::schema()
    }

    /// Displayed column names.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Labels of the displayed columns, skipping the primary key.
    pub fn verbose_columns(&self) -> Vec<&'static str> {
        let schema = self.schema();
        self.columns
            .iter()
            .filter(|column| **column != schema.primary_key)
            .map(|column| schema.label_for(*column))
            .collect()
    }

    /// Column header descriptors.
    pub fn headers(&self) -> Vec<Header> {
        self.sorter.table_headers()
    }

    /// The parsed sort state.
    pub fn sorter(&self) -> &Sorter {
        &self.sorter
    }

    /// Pagination state.
    pub fn pagination(&self) -> &Pagination<C> {
        &self.pagination
    }

    /// Search form value.
    pub fn search_form(&self) -> &SearchForm {
        &self.search_form
    }

    /// Records of the requested page.
    pub fn objects(&self) -> Result<Vec<C::Item>> {
        self.pagination.get_objects()
    }

    /// Rendered rows of the requested page.
    pub fn rows(&self) -> Result<Vec<Row>> {
        let primary_key = self.schema().primary_key;
        let rows = self
            .objects()?
            .iter()
            .map(|item| {
                let record: &D::Model = item.borrow();
                Row {
                    key: kara_query::Record::field_value(record, primary_key)
                        .to_text()
                        .map(|key| key.into_owned()),
                    cells: self
                        .columns
                        .iter()
                        .map(|column| self.definition.display_for_value(record, column))
                        .collect(),
                }
            })
            .collect();
        Ok(rows)
    }

    /// Serializable snapshot of the requested page.
    pub fn page(&self) -> Result<TablePage> {
        Ok(TablePage {
            columns: self.columns.iter().map(|c| c.to_string()).collect(),
            verbose_columns: self
                .verbose_columns()
                .into_iter()
                .map(str::to_string)
                .collect(),
            headers: self.headers(),
            search_form: self.search_form.clone(),
            pagination: self.pagination.summary(),
            rows: self.rows()?,
        })
    }
}

/// Everything a renderer needs for one table page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePage {
    pub columns: Vec<String>,
    pub verbose_columns: Vec<String>,
    pub headers: Vec<Header>,
    pub search_form: SearchForm,
    pub pagination: PaginationSummary,
    pub rows: Vec<Row>,
}
