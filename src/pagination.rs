use crate::types::Page;

/// Flatten fetched pages into one list, in fetch order.
///
/// Returns `None` when nothing has been fetched yet, so callers can tell
/// "still loading" apart from "collection is empty" (`Some(vec![])`).
pub fn reduce<T: Clone>(pages: &[Page<T>]) -> Option<Vec<T>> {
    if pages.is_empty() {
        return None;
    }
    let total = pages.iter().map(|page| page.data.len()).sum();
    let mut items = Vec::with_capacity(total);
    for page in pages {
        items.extend(page.data.iter().cloned());
    }
    Some(items)
}

/// Page number to request after `last`. Never consults `total_pages`.
pub fn next_page_param<T>(last: &Page<T>) -> u32 {
    last.pagination.current_page.saturating_add(1)
}

/// True once the viewport bottom is within `threshold` of the end of the content.
///
/// Signed arithmetic: content shorter than the viewport always triggers.
pub fn should_fetch_next(
    scroll_offset: i64,
    content_height: i64,
    viewport_height: i64,
    threshold: i64,
) -> bool {
    scroll_offset >= content_height - viewport_height - threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    /// Treat a page with no items as the end of the collection
    pub stop_on_empty_page: bool,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            stop_on_empty_page: true,
        }
    }
}

impl PaginationPolicy {
    pub fn next_page<T>(&self, last: &Page<T>) -> Option<u32> {
        if self.stop_on_empty_page && last.data.is_empty() {
            return None;
        }
        Some(next_page_param(last))
    }
}

/// Observable lifecycle of one paginated query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Idle,
    Loading,
    Ready { pages: usize },
    LoadingMore { pages: usize },
}
