//! Pagination over ordered title lists
//!
//! Pages are derived views, recomputed from the live catalog on every
//! navigation step — there is no cached page state to invalidate.

use serde::{Deserialize, Serialize};

/// A bounded window over an ordered list of titles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Titles visible on this page, in storage order
    pub titles: Vec<String>,
    /// Zero-based page number as requested by the caller
    pub index: usize,
    /// ceil(total_items / page_size); 0 only for an empty list
    pub total_pages: usize,
}

impl Page {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.index < self.total_pages - 1
    }

    /// One-based "current/total" indicator shown on the page button
    pub fn indicator(&self) -> String {
        format!("{}/{}", self.index + 1, self.total_pages)
    }
}

/// Split `items` into fixed-size pages and return the window at `page_index`.
///
/// Does not clamp: an out-of-range index yields an empty `titles` list
/// rather than an error. Callers rendering navigation buttons must keep
/// the index within `[0, total_pages - 1]` themselves.
pub fn paginate(items: &[String], page_index: usize, page_size: usize) -> Page {
    debug_assert!(page_size > 0, "page_size must be positive");
    let total_pages = items.len().div_ceil(page_size);

    let start = page_index.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    let titles = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        titles,
        index: page_index,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("سورة {}", i)).collect()
    }

    #[test]
    fn test_empty_list_has_zero_pages() {
        let page = paginate(&[], 0, 10);
        assert!(page.titles.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(paginate(&titles(1), 0, 10).total_pages, 1);
        assert_eq!(paginate(&titles(10), 0, 10).total_pages, 1);
        assert_eq!(paginate(&titles(11), 0, 10).total_pages, 2);
        assert_eq!(paginate(&titles(23), 0, 10).total_pages, 3);
    }

    #[test]
    fn test_first_page_of_23_titles() {
        let page = paginate(&titles(23), 0, 10);
        assert_eq!(page.titles.len(), 10);
        assert!(!page.has_prev());
        assert!(page.has_next());
        assert_eq!(page.indicator(), "1/3");
    }

    #[test]
    fn test_last_page_of_23_titles() {
        let page = paginate(&titles(23), 2, 10);
        assert_eq!(page.titles.len(), 3);
        assert!(page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.indicator(), "3/3");
    }

    #[test]
    fn test_pages_concatenate_to_full_list_in_order() {
        let all = titles(23);
        let mut collected = Vec::new();
        let total = paginate(&all, 0, 10).total_pages;
        for i in 0..total {
            collected.extend(paginate(&all, i, 10).titles);
        }
        assert_eq!(collected, all);
    }

    #[test]
    fn test_out_of_range_index_yields_empty_page() {
        let all = titles(23);
        for index in [3, 4, 100, usize::MAX] {
            let page = paginate(&all, index, 10);
            assert!(page.titles.is_empty(), "index {} must be empty", index);
            assert_eq!(page.total_pages, 3);
        }
    }

    #[test]
    fn test_exact_multiple_has_no_phantom_page() {
        let page = paginate(&titles(20), 1, 10);
        assert_eq!(page.titles.len(), 10);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next());
    }
}
