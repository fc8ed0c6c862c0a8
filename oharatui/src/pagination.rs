//! Page-number window computation for the catalog pagination control.

/// One renderable element of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// How many consecutive page numbers the window shows at most.
pub const MAX_PAGES_SHOWN: u32 = 5;

/// Computes the ordered items of the pagination control for a 1-based
/// `current_page` out of `total_pages`.
///
/// With five or fewer pages every page is listed. Otherwise a five-page
/// consecutive window is centered on the current page where possible and
/// clamped at the ends; the first and last page are always reachable, with an
/// ellipsis marking a gap of more than one page.
#[must_use]
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current_page.clamp(1, total_pages);

    let (start, end) = if total_pages <= MAX_PAGES_SHOWN {
        (1, total_pages)
    } else {
        let before = MAX_PAGES_SHOWN / 2;
        let after = MAX_PAGES_SHOWN.div_ceil(2) - 1;
        if current <= before {
            (1, MAX_PAGES_SHOWN)
        } else if current + after >= total_pages {
            (total_pages - MAX_PAGES_SHOWN + 1, total_pages)
        } else {
            (current - before, current + after)
        }
    };

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

/// Clamps a requested page into `[1, total_pages]`; a request past either
/// boundary lands on the boundary instead of erroring. An empty result set
/// still has a page 1.
#[must_use]
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let max = i64::from(total_pages.max(1));
    u32::try_from(requested.clamp(1, max)).unwrap_or(1)
}
