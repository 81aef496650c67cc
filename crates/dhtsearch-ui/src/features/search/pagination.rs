//! Page navigation window.

/// Pages shown without ellipses.
const MAX_VISIBLE: u32 = 7;

/// One slot in the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSlot {
    /// Link to a page.
    Page(u32),
    /// Gap between non-adjacent pages.
    Ellipsis,
}

/// Pagination bar for `current` out of `total_pages`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// Page being shown.
    pub current: u32,
    /// Last page.
    pub total: u32,
    /// Slots left to right.
    pub slots: Vec<PageSlot>,
}

impl Pagination {
    /// Build the bar; `None` when there is at most one page.
    #[must_use]
    pub fn new(current: u32, total_pages: u64) -> Option<Self> {
        let total = u32::try_from(total_pages).unwrap_or(u32::MAX);
        if total <= 1 {
            return None;
        }
        let current = current.clamp(1, total);
        Some(Self {
            current,
            total,
            slots: page_window(current, total),
        })
    }

    /// Page behind the "previous" control.
    #[must_use]
    pub const fn prev(&self) -> Option<u32> {
        if self.current > 1 {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Page behind the "next" control.
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        if self.current < self.total {
            Some(self.current + 1)
        } else {
            None
        }
    }
}

/// Slots around `current`, keeping the first and last page reachable.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= MAX_VISIBLE {
        return (1..=total).map(PageSlot::Page).collect();
    }
    let current = current.clamp(1, total);
    let mut slots = Vec::with_capacity(MAX_VISIBLE as usize);
    if current <= 4 {
        slots.extend((1..=5).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    } else if current >= total - 3 {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((total - 4..=total).map(PageSlot::Page));
    } else {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((current - 1..=current + 1).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::PageSlot::{Ellipsis, Page};
    use super::*;

    #[test]
    fn short_ranges_show_every_page() {
        assert_eq!(
            page_window(2, 7),
            (1..=7).map(Page).collect::<Vec<_>>()
        );
    }

    #[test]
    fn near_start() {
        assert_eq!(
            page_window(3, 20),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn near_end() {
        assert_eq!(
            page_window(18, 20),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn middle() {
        assert_eq!(
            page_window(10, 20),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn single_page_has_no_bar() {
        assert!(Pagination::new(1, 1).is_none());
        assert!(Pagination::new(1, 0).is_none());
    }

    #[test]
    fn prev_and_next_respect_bounds() {
        let bar = Pagination::new(1, 7).unwrap();
        assert_eq!(bar.prev(), None);
        assert_eq!(bar.next(), Some(2));
        let bar = Pagination::new(9, 7).unwrap();
        assert_eq!(bar.current, 7);
        assert_eq!(bar.next(), None);
        assert_eq!(bar.prev(), Some(6));
    }
}
