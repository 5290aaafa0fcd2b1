//! Page-number window shown under paginated tables.

use serde::{Serialize, Serializer};

/// Up to this many pages are listed without ellipses.
pub const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u64(*n as u64),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Page numbers to render for `current` out of `total` pages.
///
/// The first and last page are always present once `total` exceeds
/// [`MAX_VISIBLE`]; the window around `current` is clamped at both ends.
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= MAX_VISIBLE {
        return (1..=total).map(Page).collect();
    }

    let mut pages = Vec::with_capacity(7);
    if current <= 3 {
        pages.extend((1..=4).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    } else if current >= total - 2 {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((total - 3..=total).map(Page));
    } else {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((current - 1..=current + 1).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    }
    pages
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    pub pages: Vec<PageItem>,
    pub start_item: usize,
    pub end_item: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationView {
    /// `None` when there is at most one page and no controls are shown.
    pub fn new(
        current: usize,
        total_pages: usize,
        per_page: usize,
        total_items: usize,
    ) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        Some(Self {
            current_page: current,
            total_pages,
            pages: page_window(current, total_pages),
            start_item: current
                .saturating_sub(1)
                .saturating_mul(per_page)
                .saturating_add(1),
            end_item: current.saturating_mul(per_page).min(total_items),
            total_items,
            has_previous: current > 1,
            has_next: current < total_pages,
        })
    }
}
