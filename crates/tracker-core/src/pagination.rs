//! Page-count and page-window arithmetic for list views.

/// How many page links appear on each side of the current page.
pub const PAGE_WINDOW_RADIUS: u32 = 2;

/// `ceil(total_items / page_size)`; zero items (or a zero page size) give
/// zero pages.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page indices within [`PAGE_WINDOW_RADIUS`] of `current`, clamped to
/// `[0, total_pages - 1]`.
///
/// A `current` past the last page is pulled back onto it first, so the
/// window is never empty while pages exist.
pub fn visible_pages(current: u32, total_pages: u32) -> Vec<u32> {
    let Some(last) = total_pages.checked_sub(1) else {
        return Vec::new();
    };
    let current = current.min(last);
    let start = current.saturating_sub(PAGE_WINDOW_RADIUS);
    let end = current.saturating_add(PAGE_WINDOW_RADIUS).min(last);
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn window_is_clamped_at_both_ends() {
        assert_eq!(visible_pages(0, 10), vec![0, 1, 2]);
        assert_eq!(visible_pages(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(visible_pages(9, 10), vec![7, 8, 9]);
        assert_eq!(visible_pages(0, 1), vec![0]);
        assert_eq!(visible_pages(0, 0), Vec::<u32>::new());
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        // 25 issues at 10 per page, page 5 requested.
        let pages = total_pages(25, 10);
        assert_eq!(pages, 3);
        assert_eq!(visible_pages(5, pages), vec![0, 1, 2]);
    }

    #[test]
    fn window_stays_in_bounds_and_contains_current() {
        for total in 0..12 {
            for current in 0..15 {
                let window = visible_pages(current, total);
                assert!(window.iter().all(|&p| p < total));
                assert!(window.len() <= 5);
                if total > 0 {
                    assert!(window.contains(&current.min(total - 1)));
                } else {
                    assert!(window.is_empty());
                }
            }
        }
    }
}
