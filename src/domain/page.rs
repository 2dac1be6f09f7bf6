//! Pagination on both sides of the API boundary.
//!
//! The UI counts pages from 1, the backend from 0. [`PageRequest`] holds the
//! UI value and [`PageRequest::index`] is the only place that converts it.

use crate::error::{Result, TaskboardError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page slots shown by the pager before ellipses kick in
const MAX_PAGE_LINKS: u32 = 5;

/// A 1-based page of a given size, as selected in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Result<Self> {
        if page == 0 {
            return Err(TaskboardError::InvalidPage(
                "pages are numbered from 1".to_string(),
            ));
        }
        if size == 0 {
            return Err(TaskboardError::InvalidPage(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn first(size: u32) -> Result<Self> {
        Self::new(1, size)
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 0-based page index sent over the wire
    pub fn index(&self) -> u32 {
        self.page - 1
    }

    /// Offset of the first item of this page
    pub fn offset(&self) -> usize {
        (self.index() as usize).saturating_mul(self.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results in the backend's shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// 0-based
    pub number: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Cuts the requested page out of the full, already ordered result set
    pub fn paginate(all: Vec<T>, request: PageRequest) -> Self {
        let total_elements = all.len() as u64;
        let content: Vec<T> = all
            .into_iter()
            .skip(request.offset())
            .take(request.size() as usize)
            .collect();
        Self::assemble(content, total_elements, request)
    }

    /// A page with nothing in it, for queries that cannot match anything
    pub fn empty(request: PageRequest) -> Self {
        Self::assemble(Vec::new(), 0, request)
    }

    fn assemble(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        let total_pages = total_pages(total_elements, request.size());
        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            size: request.size(),
            number: request.index(),
            first: request.index() == 0,
            last: request.page() >= total_pages,
        }
    }

    /// Checks a page received from the backend and repairs derived flags
    pub fn normalized(mut self) -> Result<Self> {
        if self.content.len() > self.size as usize {
            return Err(TaskboardError::MalformedResponse(format!(
                "page holds {} items but its size is {}",
                self.content.len(),
                self.size
            )));
        }
        self.empty = self.content.is_empty();
        Ok(self)
    }

    /// 1-based page number for display
    pub fn ui_page(&self) -> u32 {
        self.number.saturating_add(1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

/// `ceil(total / size)`, zero for an empty result
pub fn total_pages(total_elements: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
}

/// One slot of the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

/// Page numbers to render around the current page
///
/// First and last page are always present; with more than five pages the
/// middle collapses to the neighbours of `current`, with ellipses marking
/// the gaps. A `current` outside `1..=total_pages` is clamped.
///
/// # Examples
/// ```
/// use taskboard_core::domain::page::{page_links, PageLink::*};
///
/// assert_eq!(
///     page_links(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
pub fn page_links(current: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= MAX_PAGE_LINKS {
        return (1..=total_pages).map(PageLink::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let mut links = vec![PageLink::Page(1)];

    let mut start = current.saturating_sub(1).max(2);
    let mut end = current.saturating_add(1).min(total_pages - 1);

    if current <= 2 {
        end = (total_pages - 1).min(4);
    } else if current >= total_pages - 1 {
        start = total_pages.saturating_sub(3).max(2);
    }

    if start > 2 {
        links.push(PageLink::Ellipsis);
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total_pages - 1 {
        links.push(PageLink::Ellipsis);
    }

    links.push(PageLink::Page(total_pages));
    links
}

/// 1-based inclusive range of items shown on `current`, `None` when empty
pub fn item_range(current: u32, size: u32, total_items: u64) -> Option<(u64, u64)> {
    if total_items == 0 || current == 0 {
        return None;
    }
    let start = u64::from(current - 1) * u64::from(size) + 1;
    if start > total_items {
        return None;
    }
    let end = (u64::from(current) * u64::from(size)).min(total_items);
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_page_request_rejects_zero() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[test]
    fn test_first_ui_page_is_wire_index_zero() {
        let request = PageRequest::new(1, 10).unwrap();
        assert_eq!(request.index(), 0);

        let page = Page::paginate(numbers(3), request);
        assert_eq!(page.number, 0);
        assert_eq!(page.ui_page(), 1);
    }

    #[test]
    fn test_twenty_five_items_first_page() {
        let page = Page::paginate(numbers(25), PageRequest::new(1, 10).unwrap());

        assert_eq!(page.content.len(), 10);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);
        assert!(!page.empty);
    }

    #[test]
    fn test_twenty_five_items_last_page() {
        let page = Page::paginate(numbers(25), PageRequest::new(3, 10).unwrap());

        assert_eq!(page.content, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.number, 2);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = Page::paginate(numbers(5), PageRequest::new(4, 10).unwrap());

        assert!(page.content.is_empty());
        assert!(page.empty);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_empty_result() {
        let page: Page<u32> = Page::empty(PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.empty);
        assert!(page.first);
        assert!(page.last);
    }

    #[test]
    fn test_page_invariants_hold_for_many_shapes() {
        for total in [0u32, 1, 9, 10, 11, 99, 100] {
            for size in [1u32, 3, 10, 50] {
                for page_no in 1..=5 {
                    let page = Page::paginate(numbers(total), PageRequest::new(page_no, size).unwrap());
                    assert!(page.content.len() <= size as usize);
                    assert_eq!(page.content.is_empty(), page.empty);
                    assert_eq!(page.total_pages, (total as f64 / size as f64).ceil() as u32);
                }
            }
        }
    }

    #[test]
    fn test_normalized_rejects_oversized_page() {
        let page = Page {
            content: vec![1, 2, 3],
            total_elements: 3,
            total_pages: 2,
            size: 2,
            number: 0,
            first: true,
            last: false,
            empty: false,
        };
        assert!(matches!(page.normalized(), Err(TaskboardError::MalformedResponse(_))));
    }

    #[test]
    fn test_normalized_recomputes_empty_flag() {
        let page: Page<u32> = Page {
            content: vec![],
            total_elements: 0,
            total_pages: 0,
            size: 10,
            number: 0,
            first: true,
            last: true,
            empty: false,
        };
        assert!(page.normalized().unwrap().empty);
    }

    #[test]
    fn test_page_links_small() {
        assert_eq!(
            page_links(2, 3),
            vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
        );
        assert!(page_links(1, 0).is_empty());
    }

    #[test]
    fn test_page_links_window() {
        use PageLink::*;

        assert_eq!(page_links(1, 10), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]);
        assert_eq!(
            page_links(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(page_links(10, 10), vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]);
    }

    #[test]
    fn test_page_links_far_out_page() {
        use PageLink::*;

        assert_eq!(
            page_links(u32::MAX, 25),
            vec![Page(1), Ellipsis, Page(22), Page(23), Page(24), Page(25)]
        );
        assert_eq!(page_links(0, 10), page_links(1, 10));
    }

    #[test]
    fn test_counts_from_server_do_not_overflow() {
        let page: Page<u32> = Page {
            content: Vec::new(),
            total_elements: u64::MAX,
            total_pages: u32::MAX,
            size: 1,
            number: u32::MAX,
            first: false,
            last: true,
            empty: true,
        };
        assert_eq!(page.ui_page(), u32::MAX);
        assert_eq!(total_pages(u64::MAX, 1), u32::MAX);

        let request = PageRequest::new(u32::MAX, u32::MAX).unwrap();
        assert!(Page::paginate(numbers(3), request).empty);
    }

    #[test]
    fn test_item_range() {
        assert_eq!(item_range(1, 10, 25), Some((1, 10)));
        assert_eq!(item_range(3, 10, 25), Some((21, 25)));
        assert_eq!(item_range(1, 10, 0), None);
        assert_eq!(item_range(4, 10, 25), None);
    }
}
