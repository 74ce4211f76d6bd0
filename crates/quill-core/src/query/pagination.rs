//! Page-number pagination with lenient page resolution.

use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: usize = 3;

/// A single page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub number: usize,
    /// Total number of pages, at least 1.
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// Transform the items while keeping page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}

/// Splits an ordered sequence into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `count` items. An empty sequence still has one page.
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    /// Get a page, returning a valid page for any token.
    ///
    /// - Missing or non-numeric tokens resolve to page 1.
    /// - Tokens below 1 resolve to page 1.
    /// - Tokens past the end resolve to the last page.
    pub fn get_page<T>(&self, items: Vec<T>, token: Option<&str>) -> Page<T> {
        let count = items.len();
        let num_pages = self.num_pages(count);
        let number = resolve_page_number(token, num_pages);

        let items = items
            .into_iter()
            .skip((number - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            items,
            number,
            num_pages,
            count,
        }
    }
}

fn resolve_page_number(token: Option<&str>, num_pages: usize) -> usize {
    let Some(requested) = token.and_then(|t| t.trim().parse::<i64>().ok()) else {
        return 1;
    };
    if requested < 1 {
        return 1;
    }
    usize::try_from(requested)
        .map(|n| n.min(num_pages))
        .unwrap_or(num_pages)
}
