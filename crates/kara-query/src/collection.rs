//! Lazy record collections.
//!
//! A [`Collection`] is a query description over some record store: filters,
//! orderings, and a window are accumulated without touching the records, and
//! only [`Collection::fetch`] materialises results. [`MemoryCollection`] is the
//! in-memory implementation over a borrowed slice.

use std::fmt;

use crate::error::Result;
use crate::ordering::{compare_by_keys, OrderBy, SortKey};
use crate::query::Query;
use crate::schema::Schema;
use crate::traits::Model;

/// An ordered, filterable, sliceable set of records.
///
/// Every combinator consumes the collection and returns a refined one; none
/// of them evaluates records. `count` evaluates the filters but never sorts.
pub trait Collection: Sized {
    /// The materialised item type.
    type Item;

    /// Schema of the records in this collection.
    fn schema(&self) -> &'static Schema;

    /// Number of records the collection would return, window included.
    fn count(&self) -> usize;

    /// Narrows the collection. Filters accumulate and are ANDed together.
    ///
    /// Returns an error if a clause path does not resolve against the schema.
    fn filter(self, query: Query) -> Result<Self>;

    /// Replaces the ordering. Earlier entries have higher priority.
    fn order_by(self, orderings: Vec<OrderBy>) -> Self;

    /// Restricts the collection to `limit` records starting at `offset`,
    /// relative to the current window.
    fn window(self, offset: usize, limit: Option<usize>) -> Self;

    /// Evaluates the collection.
    fn fetch(&self) -> Vec<Self::Item>;
}

/// A [`Collection`] over a borrowed slice of models.
pub struct MemoryCollection<'a, T: Model> {
    items: &'a [T],
    filters: Vec<Query>,
    orderings: Vec<OrderBy>,
    offset: usize,
    limit: Option<usize>,
}

impl<'a, T: Model> MemoryCollection<'a, T> {
    /// Creates a collection over `items` in their stored order.
    pub fn new(items: &'a [T]) -> Self {
        MemoryCollection {
            items,
            filters: Vec::new(),
            orderings: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    /// The orderings currently applied.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// The filters currently applied.
    pub fn filters(&self) -> &[Query] {
        &self.filters
    }

    /// Current window as `(offset, limit)`.
    pub fn window_bounds(&self) -> (usize, Option<usize>) {
        (self.offset, self.limit)
    }

    fn matches(&self, item: &T) -> bool {
        self.filters.iter().all(|query| query.matches(item))
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        // Unknown ordering fields are skipped
        self.orderings
            .iter()
            .filter_map(|order| order.resolve(T::schema()).ok())
            .collect()
    }

    fn windowed(&self, matched: usize) -> usize {
        let available = matched.saturating_sub(self.offset);
        match self.limit {
            Some(limit) => available.min(limit),
            None => available,
        }
    }
}

impl<'a, T: Model> Collection for MemoryCollection<'a, T> {
    type Item = &'a T;

    fn schema(&self) -> &'static Schema {
        T::schema()
    }

    fn count(&self) -> usize {
        let matched = self.items.iter().filter(|item| self.matches(item)).count();
        self.windowed(matched)
    }

    fn filter(mut self, query: Query) -> Result<Self> {
        query.validate(T::schema())?;
        if !query.is_empty() {
            self.filters.push(query);
        }
        Ok(self)
    }

    fn order_by(mut self, orderings: Vec<OrderBy>) -> Self {
        self.orderings = orderings;
        self
    }

    fn window(mut self, offset: usize, limit: Option<usize>) -> Self {
        self.limit = match (self.limit, limit) {
            (Some(current), Some(limit)) => Some(current.saturating_sub(offset).min(limit)),
            (Some(current), None) => Some(current.saturating_sub(offset)),
            (None, limit) => limit,
        };
        self.offset += offset;
        self
    }

    fn fetch(&self) -> Vec<&'a T> {
        let items: &'a [T] = self.items;
        let mut results: Vec<&'a T> = items.iter().filter(|item| self.matches(item)).collect();

        let keys = self.sort_keys();
        if !keys.is_empty() {
            // Stable: ties keep their stored order
            results.sort_by(|a, b| compare_by_keys(*a, *b, &keys));
        }

        results
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

impl<T: Model> Clone for MemoryCollection<'_, T> {
    fn clone(&self) -> Self {
        MemoryCollection {
            items: self.items,
            filters: self.filters.clone(),
            orderings: self.orderings.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl<T: Model> fmt::Debug for MemoryCollection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCollection")
            .field("model", &T::schema().name)
            .field("len", &self.items.len())
            .field("filters", &self.filters.len())
            .field("orderings", &self.orderings)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}
