//! Paginated collection payload

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One page of a remotely filtered collection.
///
/// `total_count` is the authoritative count under the filter that produced
/// this page, not the length of `items`. A page never carries more items than
/// its declared `page_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records in this page, in server order
    pub items: Vec<T>,
    /// Authoritative count under the current filter
    pub total_count: u64,
    /// 1-based page number
    pub page: u32,
    /// Maximum items per page
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Build a page, enforcing the `items.len() <= page_size` invariant.
    pub fn new(items: Vec<T>, total_count: u64, page: u32, page_size: u32) -> Result<Self> {
        if items.len() > page_size as usize {
            return Err(Error::PageOverflow {
                len: items.len(),
                page_size,
            });
        }
        Ok(Self {
            items,
            total_count,
            page,
            page_size,
        })
    }

    /// An empty page for the given cursor position.
    #[must_use]
    pub const fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }

    /// Whether the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_rejects_oversized_pages() {
        let err = Page::new(vec![1, 2, 3], 3, 1, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::PageOverflow { len: 3, page_size: 2 }
        ));
    }

    #[test]
    fn new_accepts_pages_within_size() {
        let page = Page::new(vec![1, 2], 10, 1, 2).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 10);
    }

    #[test]
    fn empty_page_has_no_items() {
        let page = Page::<u8>::empty(1, 25);
        assert!(page.is_empty());
        assert_eq!(page.page_size, 25);
    }
}
