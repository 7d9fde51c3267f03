//! Fixed-size pagination over the reading list.

use std::ops::Range;

/// Default number of rows per history page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Maximum number of page-number buttons shown at once.
const MAX_PAGE_BUTTONS: usize = 3;

/// Number of pages needed for `total` items, never less than 1.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Index range of a 1-based page, truncated to the list.
pub fn page_range(total: usize, page_size: usize, page: usize) -> Range<usize> {
    let page = page.clamp(1, page_count(total, page_size));
    let start = ((page - 1) * page_size).min(total);
    let end = (page * page_size).min(total);
    start..end
}

/// Paging state for one table.
///
/// Holds only the page size and the current page; every method takes the
/// current list length so the state is re-clamped whenever the list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Create a paginator on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current 1-based page.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self, total: usize) -> usize {
        page_count(total, self.page_size)
    }

    /// Rows on the current page.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[page_range(items.len(), self.page_size, self.current)]
    }

    /// Bring the current page back into range after the list changed.
    pub fn clamp(&mut self, total: usize) {
        self.current = self.current.clamp(1, self.page_count(total));
    }

    /// Jump to a page, clamped into range.
    pub fn goto(&mut self, page: usize, total: usize) {
        self.current = page.clamp(1, self.page_count(total));
    }

    /// Go back one page; no-op on the first page.
    pub fn prev(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    /// Go forward one page; no-op on the last page.
    pub fn next(&mut self, total: usize) {
        if self.current < self.page_count(total) {
            self.current += 1;
        }
    }

    pub fn first(&mut self) {
        self.current = 1;
    }

    pub fn last(&mut self, total: usize) {
        self.current = self.page_count(total);
    }

    pub fn is_first(&self) -> bool {
        self.current <= 1
    }

    pub fn is_last(&self, total: usize) -> bool {
        self.current >= self.page_count(total)
    }

    /// Page numbers to offer as buttons: at most three, centered on the
    /// current page unless that would run past either end.
    pub fn visible_pages(&self, total: usize) -> Vec<usize> {
        let count = self.page_count(total);
        let shown = count.min(MAX_PAGE_BUTTONS);
        let current = self.current.clamp(1, count);

        let start = current.saturating_sub(shown / 2).max(1).min(count + 1 - shown);
        (start..start + shown).collect()
    }
}
