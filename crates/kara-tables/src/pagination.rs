//! Page windows over a record collection.
//!
//! [`Pagination`] reads the requested page from the query parameters, counts
//! the collection once, and only materialises records in
//! [`Pagination::get_objects`]. When the whole collection fits in one page,
//! pagination is a no-op and `get_objects` returns every record regardless of
//! the requested page.
//!
//! # Page ranges
//!
//! [`Pagination::page_range`] yields the page selector contents, eliding long
//! gaps:
//!
//! ```
//! use kara_tables::PageRange;
//!
//! let range: Vec<String> = PageRange::elided(6, 50, 3, 2).map(|l| l.to_string()).collect();
//! assert_eq!(range, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "…", "49", "50"]);
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use kara_query::Collection;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, TableError};
use crate::params::QueryParams;
use crate::settings::TableSettings;

/// Marker rendered in place of elided pages.
pub const ELLIPSIS: &str = "…";

/// One entry of a page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A page number (1-indexed).
    Number(usize),
    /// A gap of two or more pages.
    Ellipsis,
}

impl PageLink {
    /// Returns the page number, if this is not an ellipsis.
    pub fn number(self) -> Option<usize> {
        match self {
            PageLink::Number(n) => Some(n),
            PageLink::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLink::Number(n) => write!(f, "{n}"),
            PageLink::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

impl Serialize for PageLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PageLink::Number(n) => serializer.serialize_u64(*n as u64),
            PageLink::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Lazy, elided sequence of [`PageLink`]s.
///
/// The sequence is built from three contiguous runs of page numbers (head,
/// window around the current page, tail) separated by at most one ellipsis
/// each.
#[derive(Debug, Clone)]
pub struct PageRange {
    head: RangeInclusive<usize>,
    left_gap: bool,
    window: RangeInclusive<usize>,
    right_gap: bool,
    tail: RangeInclusive<usize>,
}

#[allow(clippy::reversed_empty_ranges)]
const EMPTY: RangeInclusive<usize> = 1..=0;

impl PageRange {
    /// Lists every page from 1 to `num_pages`.
    pub fn full(num_pages: usize) -> Self {
        PageRange {
            head: 1..=num_pages,
            left_gap: false,
            window: EMPTY,
            right_gap: false,
            tail: EMPTY,
        }
    }

    /// Elided range around `number`.
    ///
    /// Ranges of at most `(on_each_side + on_ends) * 2` pages are listed in
    /// full. Otherwise the first and last `on_ends` pages are always shown,
    /// together with `on_each_side` pages on each side of `number`. A gap of
    /// two or more pages collapses into a single ellipsis, while a gap of one
    /// page is listed. `on_ends` is treated
    /// as at least 1, and `number` is clamped into `1..=num_pages`.
    pub fn elided(number: usize, num_pages: usize, on_each_side: usize, on_ends: usize) -> Self {
        let on_ends = on_ends.max(1);
        if num_pages <= (on_each_side + on_ends) * 2 {
            return PageRange::full(num_pages);
        }
        let number = number.clamp(1, num_pages);

        let (head, left_gap, window_start) = if number > on_each_side + on_ends + 2 {
            (1..=on_ends, true, number - on_each_side)
        } else {
            (EMPTY, false, 1)
        };

        let (window_end, right_gap, tail) = if number + on_each_side + on_ends + 1 < num_pages {
            (
                number + on_each_side,
                true,
                (num_pages - on_ends + 1)..=num_pages,
            )
        } else {
            (num_pages, false, EMPTY)
        };

        PageRange {
            head,
            left_gap,
            window: window_start..=window_end,
            right_gap,
            tail,
        }
    }
}

impl Iterator for PageRange {
    type Item = PageLink;

    fn next(&mut self) -> Option<PageLink> {
        if let Some(n) = self.head.next() {
            return Some(PageLink::Number(n));
        }
        if std::mem::take(&mut self.left_gap) {
            return Some(PageLink::Ellipsis);
        }
        if let Some(n) = self.window.next() {
            return Some(PageLink::Number(n));
        }
        if std::mem::take(&mut self.right_gap) {
            return Some(PageLink::Ellipsis);
        }
        self.tail.next().map(PageLink::Number)
    }
}

/// Reads a page number; anything that is not an integer means page 1.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

/// Pagination state for one request.
#[derive(Debug, Clone)]
pub struct Pagination<C> {
    collection: C,
    params: QueryParams,
    page_var: String,
    per_page: usize,
    on_each_side: usize,
    on_ends: usize,
    page_num: i64,
    result_count: usize,
    multi_page: bool,
    num_pages: usize,
}

impl<C: Collection> Pagination<C> {
    /// Paginates `collection` with `per_page` records per page.
    ///
    /// The collection is counted once here. A `per_page` of 0 disables
    /// pagination.
    pub fn new(
        collection: C,
        params: &QueryParams,
        settings: &TableSettings,
        per_page: usize,
    ) -> Self {
        let page_num = parse_page_number(params.get(&settings.page_var));
        let result_count = collection.count();
        let multi_page = per_page > 0 && result_count > per_page;
        let num_pages = if multi_page {
            result_count.div_ceil(per_page)
        } else {
            1
        };

        debug!(
            page = page_num,
            per_page, result_count, num_pages, "paginating collection"
        );

        Pagination {
            collection,
            params: params.clone(),
            page_var: settings.page_var.clone(),
            per_page,
            on_each_side: settings.on_each_side,
            on_ends: settings.on_ends,
            page_num,
            result_count,
            multi_page,
            num_pages,
        }
    }

    /// The requested page number, as read from the parameters.
    pub fn page_num(&self) -> i64 {
        self.page_num
    }

    /// Records per page.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of records in the whole collection.
    pub fn result_count(&self) -> usize {
        self.result_count
    }

    /// Whether the collection spans more than one page.
    pub fn multi_page(&self) -> bool {
        self.multi_page
    }

    /// Total number of pages (at least 1).
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// The requested page if it exists.
    fn current_page(&self) -> Option<usize> {
        usize::try_from(self.page_num)
            .ok()
            .filter(|page| (1..=self.num_pages).contains(page))
    }

    /// Returns the requested page, or [`TableError::InvalidPage`].
    pub fn validate_page(&self) -> Result<usize> {
        self.current_page().ok_or(TableError::InvalidPage {
            page: self.page_num,
            num_pages: self.num_pages,
        })
    }

    /// Whether there is a page before the current one.
    pub fn has_previous(&self) -> bool {
        self.multi_page && self.current_page().is_some_and(|page| page > 1)
    }

    /// Whether there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.multi_page && self.current_page().is_some_and(|page| page < self.num_pages)
    }

    /// Number of the previous page.
    pub fn previous_page_number(&self) -> Option<usize> {
        self.current_page()
            .filter(|_| self.has_previous())
            .map(|page| page - 1)
    }

    /// Number of the next page.
    pub fn next_page_number(&self) -> Option<usize> {
        self.current_page()
            .filter(|_| self.has_next())
            .map(|page| page + 1)
    }

    /// Page selector entries. A single page yields `[1]`.
    pub fn page_range(&self) -> PageRange {
        if !self.multi_page {
            return PageRange::full(1);
        }
        let current = usize::try_from(self.page_num).unwrap_or(1);
        PageRange::elided(current, self.num_pages, self.on_each_side, self.on_ends)
    }

    /// Query string (with leading `?`) selecting page `page`, keeping every
    /// other parameter.
    pub fn page_link(&self, page: usize) -> String {
        self.params
            .with_value(&self.page_var, page.to_string())
            .to_string()
    }

    /// Records of the requested page.
    ///
    /// Returns the whole collection when it fits in a single page, and
    /// [`TableError::InvalidPage`] when the requested page does not exist.
    pub fn get_objects(&self) -> Result<Vec<C::Item>>
    where
        C: Clone,
    {
        if !self.multi_page {
            return Ok(self.collection.fetch());
        }
        let page = self.validate_page()?;
        let offset = (page - 1) * self.per_page;
        debug!(page, offset, limit = self.per_page, "fetching page window");
        Ok(self
            .collection
            .clone()
            .window(offset, Some(self.per_page))
            .fetch())
    }

    /// Serializable description of this pagination for renderers.
    pub fn summary(&self) -> PaginationSummary {
        let current = self.current_page();
        PaginationSummary {
            page_num: self.page_num,
            per_page: self.per_page,
            result_count: self.result_count,
            num_pages: self.num_pages,
            multi_page: self.multi_page,
            previous: self.previous_page_number().map(|page| self.page_link(page)),
            next: self.next_page_number().map(|page| self.page_link(page)),
            pages: self
                .page_range()
                .map(|link| PageEntry {
                    link,
                    href: link.number().map(|page| self.page_link(page)),
                    current: link.number().is_some() && link.number() == current,
                })
                .collect(),
        }
    }
}

/// Serializable pagination state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    pub page_num: i64,
    pub per_page: usize,
    pub result_count: usize,
    pub num_pages: usize,
    pub multi_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub pages: Vec<PageEntry>,
}

/// One rendered page selector entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub link: PageLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub current: bool,
}
