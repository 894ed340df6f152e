//! Pagination bar layout.

/// Most numbered pages shown around the current one.
const MAX_VISIBLE_PAGES: u32 = 5;

/// One slot of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A numbered page.
    Page(u32),
    /// A gap between numbered pages.
    Ellipsis,
}

/// Lays out the pagination bar for `current` of `total` pages.
///
/// Shows up to five pages centred on `current`, shifted to stay inside
/// `1..=total`. The first and last pages are always reachable, with an
/// ellipsis where pages are skipped. Returns nothing when there is at most
/// one page.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let span = MAX_VISIBLE_PAGES.saturating_sub(1);

    let mut start = current.saturating_sub(2).max(1);
    let end = start.saturating_add(span).min(total);
    if end.saturating_sub(start) < span {
        start = end.saturating_sub(span).max(1);
    }

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end < total.saturating_sub(1) {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}
