//! Pure pagination math.

/// Compute the number of pages for a paginated list.
pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    item_count.div_ceil(page_size.max(1))
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Return start/end indices for a page window.
pub fn page_window(total_items: usize, page_size: usize, page: usize) -> (usize, usize) {
    let safe_page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(safe_page_size);
    let end = (start + safe_page_size).min(total_items);
    (start.min(total_items), end)
}

/// A single resolved page of an ordered item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Requested page after clamping, 1-based.
    pub page: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`, clamping the requested page.
///
/// Pages are contiguous and non-overlapping; every item appears on
/// exactly one page. Callers special-case empty lists before paging.
pub fn paginate<T>(items: &[T], page_size: usize, requested_page: usize) -> Page<'_, T> {
    let total = total_pages(items.len(), page_size);
    let page = clamp_page(requested_page, total);
    let (start, end) = page_window(items.len(), page_size, page);
    Page {
        items: &items[start..end],
        page,
        total_pages: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_lands_on_exactly_one_page() {
        for len in 0..40_usize {
            let items: Vec<usize> = (0..len).collect();
            for page_size in 1..=8 {
                let total = total_pages(len, page_size);
                let mut seen = Vec::new();
                for page in 1..=total {
                    let slice = paginate(&items, page_size, page);
                    assert_eq!(slice.page, page);
                    seen.extend_from_slice(slice.items);
                }
                assert_eq!(seen, items, "len={len} page_size={page_size}");
            }
        }
    }

    #[test]
    fn requested_page_is_always_clamped_into_range() {
        let items: Vec<usize> = (0..12).collect();
        for requested in [0, 1, 3, 4, 99] {
            let slice = paginate(&items, 5, requested);
            assert!(slice.page >= 1 && slice.page <= slice.total_pages);
        }
        assert_eq!(paginate(&items, 5, 0).page, 1);
        assert_eq!(paginate(&items, 5, 99).page, 3);
    }

    #[test]
    fn ceil_division_page_counts() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(12, 5), 3);
    }

    #[test]
    fn last_page_is_truncated_at_the_tail() {
        let items: Vec<usize> = (0..12).collect();
        let slice = paginate(&items, 5, 3);
        assert_eq!(slice.items, &[10, 11]);
        assert_eq!(slice.total_pages, 3);
    }

    #[test]
    fn twelve_and_three_items_at_page_size_five() {
        // baidu: 12 items -> pages of 5, 5, 2; magnet: 3 items -> one page.
        let baidu: Vec<usize> = (0..12).collect();
        let magnet: Vec<usize> = (0..3).collect();

        assert_eq!(total_pages(baidu.len(), 5), 3);
        assert_eq!(total_pages(magnet.len(), 5), 1);

        let clamped = paginate(&baidu, 5, 9);
        assert_eq!(clamped.page, 3);
        assert_eq!(clamped.items.len(), 2);
    }
}
