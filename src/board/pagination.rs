//! Page-number pagination for topic and post listings.
//!
//! Pages are numbered from 1. Page 1 always exists, even for an empty
//! listing; any other number outside `1..=num_pages` is treated as a
//! missing resource.

use std::str::FromStr;

use serde::Serialize;

use crate::{ForumError, Result};

/// Topics shown per page of a board.
pub const TOPICS_PER_PAGE: i64 = 2;

/// Posts shown per page of a topic.
pub const POSTS_PER_PAGE: i64 = 3;

/// Which page the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// A 1-based page number.
    Number(i64),
    /// The last page, whatever its number.
    Last,
}

impl Default for PageSelector {
    fn default() -> Self {
        PageSelector::Number(1)
    }
}

impl FromStr for PageSelector {
    type Err = ForumError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "last" {
            return Ok(PageSelector::Last);
        }
        s.parse::<i64>()
            .map(PageSelector::Number)
            .map_err(|_| ForumError::NotFound("page".to_string()))
    }
}

impl PageSelector {
    /// Parse the raw `page` query parameter. Absent means the first page.
    pub fn from_query(raw: Option<&str>) -> Result<Self> {
        match raw {
            None => Ok(PageSelector::default()),
            Some(s) => s.parse(),
        }
    }
}

/// A concrete page of a listing: number, size and row offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: i64,
    /// Rows per page.
    pub per_page: i64,
}

impl PageRequest {
    /// Resolve a selector against the total row count.
    pub fn resolve(selector: PageSelector, total: i64, per_page: i64) -> Result<Self> {
        let num_pages = num_pages(total, per_page);
        let number = match selector {
            PageSelector::Last => num_pages,
            PageSelector::Number(n) if (1..=num_pages).contains(&n) => n,
            PageSelector::Number(_) => return Err(ForumError::NotFound("page".to_string())),
        };
        Ok(Self { number, per_page })
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    /// Maximum rows on this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Number of pages for `total` rows; never less than one.
fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// One page of a listing, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: i64,
    /// Total number of pages.
    pub num_pages: i64,
    /// Total number of items across all pages.
    pub count: i64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
    /// Number of the next page, if any.
    pub next_page_number: Option<i64>,
    /// Number of the previous page, if any.
    pub previous_page_number: Option<i64>,
    /// All page numbers, for rendering page links.
    pub page_range: Vec<i64>,
    /// Whether the listing spans more than one page.
    pub is_paginated: bool,
}

impl<T> Page<T> {
    /// Wrap the items fetched for `request` out of `total`.
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let num_pages = num_pages(total, request.per_page);
        let has_next = request.number < num_pages;
        let has_previous = request.number > 1;
        Self {
            items,
            number: request.number,
            num_pages,
            count: total,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(request.number + 1),
            previous_page_number: has_previous.then_some(request.number - 1),
            page_range: (1..=num_pages).collect(),
            is_paginated: num_pages > 1,
        }
    }
}
