//! Column sorting driven by a repeatable ordering parameter.
//!
//! Each `order` value is a column name, optionally prefixed with `-` for
//! descending order. Priority runs right to left: the last value is the
//! primary sort key and earlier values break ties. Clicking an unsorted
//! column appends it, which makes it the new primary key.
//!
//! ```text
//! ?order=-price&order=name   ->   name ASC, then price DESC
//! ```

use kara_query::{Collection, Dir, OrderBy, Schema};
use serde::Serialize;
use tracing::{debug, warn};

use crate::params::QueryParams;

/// Parsed sort state and header metadata for one request.
#[derive(Debug, Clone)]
pub struct Sorter {
    schema: &'static Schema,
    columns: Vec<String>,
    sortable: Vec<String>,
    state: Vec<OrderBy>,
    params: QueryParams,
    order_var: String,
}

impl Sorter {
    /// Reads the ordering parameter `order_var` from `params`.
    ///
    /// Directives naming columns outside `sortable` are dropped. When a
    /// column appears more than once, its last occurrence wins, both for
    /// direction and position.
    pub fn new(
        schema: &'static Schema,
        columns: &[&str],
        sortable: &[&str],
        params: &QueryParams,
        order_var: &str,
    ) -> Self {
        let mut state: Vec<OrderBy> = Vec::new();
        for raw in params.get_all(order_var) {
            let Some(directive) = OrderBy::parse(raw) else {
                continue;
            };
            if !sortable.contains(&directive.field.as_str()) {
                warn!(
                    column = %directive.field,
                    model = schema.name,
                    "ignoring sort on undeclared column"
                );
                continue;
            }
            state.retain(|existing| existing.field != directive.field);
            state.push(directive);
        }

        Sorter {
            schema,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            sortable: sortable.iter().map(|c| c.to_string()).collect(),
            state,
            params: params.clone(),
            order_var: order_var.to_string(),
        }
    }

    /// Drops `page_var` from the header links, so a re-sorted table opens on
    /// its first page.
    pub fn resetting_page(mut self, page_var: &str) -> Self {
        self.params = self.params.without(page_var);
        self
    }

    /// Active directives in parameter order (lowest priority first).
    pub fn sort_state(&self) -> &[OrderBy] {
        &self.state
    }

    /// Active directives with the primary key first.
    pub fn priority_order(&self) -> Vec<OrderBy> {
        self.state.iter().rev().cloned().collect()
    }

    /// Whether any directive is active.
    pub fn is_sorted(&self) -> bool {
        !self.state.is_empty()
    }

    /// Applies the ordering to `collection`. Without directives the
    /// collection keeps its order.
    pub fn apply<C: Collection>(&self, collection: C) -> C {
        if self.state.is_empty() {
            return collection;
        }
        let orderings = self.priority_order();
        debug!(
            order = %orderings.iter().map(OrderBy::to_param).collect::<Vec<_>>().join(","),
            "applying sort"
        );
        collection.order_by(orderings)
    }

    fn params_for(&self, state: &[OrderBy]) -> Vec<String> {
        state.iter().map(OrderBy::to_param).collect()
    }

    fn query_for(&self, values: &[String]) -> String {
        self.params
            .with_values(&self.order_var, values.iter().cloned())
            .to_string()
    }

    /// Header descriptors for every displayed column, in column order.
    pub fn table_headers(&self) -> Vec<Header> {
        self.columns
            .iter()
            .map(|column| self.header(column))
            .collect()
    }

    fn header(&self, column: &str) -> Header {
        let label = self.schema.label_for(column).to_string();
        if !self.sortable.iter().any(|s| s == column) {
            return Header::plain(column, label);
        }

        let base = Header {
            sortable: true,
            ..Header::plain(column, label)
        };
        let Some(index) = self.state.iter().position(|d| d.field == column) else {
            let mut next = self.state.clone();
            next.push(OrderBy::asc(column));
            let sort_params = self.params_for(&next);
            return Header {
                sort_query: Some(self.query_for(&sort_params)),
                sort_params: Some(sort_params),
                ..base
            };
        };

        let directive = &self.state[index];

        let mut reversed = self.state.clone();
        reversed[index] = directive.flipped();
        let reverse_params = self.params_for(&reversed);

        let mut removed = self.state.clone();
        removed.remove(index);
        let remove_params = self.params_for(&removed);

        Header {
            sorted: true,
            direction: Some(directive.dir),
            priority: Some(self.state.len() - index),
            reverse_query: Some(self.query_for(&reverse_params)),
            reverse_params: Some(reverse_params),
            remove_query: Some(self.query_for(&remove_params)),
            remove_params: Some(remove_params),
            ..base
        }
    }
}

/// Column header descriptor.
///
/// Parameter lists are the full set of ordering values the next request
/// should carry; the matching `*_query` fields are the encoded query strings
/// with every other parameter preserved, except the page parameter after
/// [`Sorter::resetting_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub label: String,
    pub sortable: bool,
    pub sorted: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_dir"
    )]
    pub direction: Option<Dir>,
    /// 1 for the primary sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_query: Option<String>,
}

impl Header {
    fn plain(name: &str, label: String) -> Self {
        Header {
            name: name.to_string(),
            label,
            sortable: false,
            sorted: false,
            direction: None,
            priority: None,
            sort_params: None,
            sort_query: None,
            reverse_params: None,
            reverse_query: None,
            remove_params: None,
            remove_query: None,
        }
    }

    /// Whether this column is sorted ascending.
    pub fn is_ascending(&self) -> bool {
        self.direction.is_some_and(Dir::is_asc)
    }
}

fn serialize_dir<S: serde::Serializer>(
    dir: &Option<Dir>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match dir {
        Some(dir) => serializer.serialize_str(dir.as_str()),
        None => serializer.serialize_none(),
    }
}
