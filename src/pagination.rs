//! Page arithmetic and the windowed page-button strip

use std::ops::Range;

/// Pages shown on each side of the current page
pub const WINDOW_RADIUS: usize = 2;

/// One element of the page-button strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    /// Button for a 1-based page number
    Page(usize),
    /// Gap between the window and the last page
    Ellipsis,
}

/// Number of pages needed for `item_count` items; zero when there are no items
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

/// Index range of the items visible on 1-based `page`, clamped to `item_count`
pub fn page_range(page: usize, per_page: usize, item_count: usize) -> Range<usize> {
    let per_page = per_page.max(1);
    let start = page.saturating_sub(1).saturating_mul(per_page).min(item_count);
    let end = start.saturating_add(per_page).min(item_count);
    start..end
}

/// Page buttons for `current` out of `total` pages.
///
/// Shows `current ± 2` clamped to `1..=total`, then the last page if it is
/// not already in that window, with an ellipsis only when at least one page
/// is hidden between them. Every page appears at most once. Empty when there
/// is nothing to paginate.
pub fn page_buttons(current: usize, total: usize) -> Vec<PageButton> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let first = current.saturating_sub(WINDOW_RADIUS).max(1);
    let last = (current + WINDOW_RADIUS).min(total);

    let mut buttons: Vec<PageButton> = (first..=last).map(PageButton::Page).collect();
    if last < total {
        if last + 1 < total {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page(total));
    }
    buttons
}
