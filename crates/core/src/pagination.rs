use std::fmt;

use crate::domain::format::format_count;

/// Strips with at most this many pages list every page.
const FULL_STRIP_MAX: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{page}"),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

pub fn total_pages(total_results: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total_results.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page-number strip for a pager.
///
/// Up to seven pages are all listed. Past that the first and last page are
/// always present, `page - 1 ..= page + 1` is shown clamped to
/// `2 ..= total_pages - 1`, and an ellipsis fills each gap.
pub fn page_strip(page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= FULL_STRIP_MAX {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let last = total_pages;
    let start = page.saturating_sub(1).max(2);
    let end = page.saturating_add(1).min(last - 1);

    let mut items = vec![PageItem::Page(1)];
    if start <= end {
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
        items.extend((start..=end).map(PageItem::Page));
        if end < last - 1 {
            items.push(PageItem::Ellipsis);
        }
    } else {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(last));
    items
}

/// Everything a pager needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub items: Vec<PageItem>,
}

impl Pager {
    /// `None` when everything fits on one page and no pager is drawn.
    pub fn new(page: u32, total_results: u64, per_page: u32) -> Option<Self> {
        let total_pages = total_pages(total_results, per_page);
        if total_pages <= 1 {
            return None;
        }
        Some(Pager {
            page,
            total_pages,
            total_results,
            items: page_strip(page, total_pages),
        })
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn result_count_label(total_results: u64) -> String {
    if total_results == 1 {
        "1 result".to_string()
    } else {
        format!("{} results", format_count(total_results))
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn small_totals_list_every_page() {
        for page in 1..=5 {
            assert_eq!(page_strip(page, 5), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
        }
        assert_eq!(page_strip(1, 7).len(), 7);
        assert!(page_strip(1, 0).is_empty());
    }

    #[test]
    fn middle_page_has_two_gaps() {
        assert_eq!(
            page_strip(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn first_page_window_is_clamped() {
        assert_eq!(page_strip(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
    }

    #[test]
    fn last_page_window_is_clamped() {
        assert_eq!(page_strip(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
    }

    #[test]
    fn no_ellipsis_when_window_touches_an_edge() {
        assert_eq!(page_strip(3, 10), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]);
        assert_eq!(page_strip(8, 10), vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]);
    }

    #[test]
    fn page_past_the_end_still_renders() {
        assert_eq!(page_strip(50, 10), vec![Page(1), Ellipsis, Page(10)]);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
    }

    #[test]
    fn pager_hidden_for_single_page() {
        assert!(Pager::new(1, 20, 20).is_none());
        let pager = Pager::new(1, 41, 20).unwrap();
        assert_eq!(pager.total_pages, 3);
        assert!(!pager.has_prev());
        assert!(pager.has_next());
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(result_count_label(1), "1 result");
        assert_eq!(result_count_label(0), "0 results");
        assert_eq!(result_count_label(14100), "14,100 results");
    }

    #[test]
    fn ellipsis_renders_as_glyph() {
        assert_eq!(Ellipsis.to_string(), "…");
        assert_eq!(Page(12).to_string(), "12");
    }
}
