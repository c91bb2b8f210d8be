//! Page-by-page access to the raw rows of a view.

use bikeshare_core::error::{ExplorerError, Result};
use bikeshare_core::models::TripRecord;

use crate::filter::FilteredView;

/// Rows shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// What a call to [`PageCursor::next_page`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// A full page was returned and more rows follow.
    More,
    /// Rows were returned and none remain after them.
    Last,
    /// Nothing was returned: the end had already been reached.
    Exhausted,
}

/// One page of rows.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub records: Vec<&'a TripRecord>,
    pub status: PageStatus,
    /// Zero-based position of the first row of this page within the view.
    pub offset: usize,
}

impl Page<'_> {
    /// Whether the view has no rows beyond this page.
    pub fn is_end(&self) -> bool {
        self.status != PageStatus::More
    }
}

/// Cursor over a [`FilteredView`]. A new view needs a new cursor.
#[derive(Debug, Clone)]
pub struct PageCursor<'a> {
    view: FilteredView<'a>,
    page_size: usize,
    position: usize,
}

impl<'a> PageCursor<'a> {
    /// Cursor with [`DEFAULT_PAGE_SIZE`].
    pub fn new(view: FilteredView<'a>) -> Self {
        Self {
            view,
            page_size: DEFAULT_PAGE_SIZE,
            position: 0,
        }
    }

    /// Cursor with an explicit page size; zero is rejected.
    pub fn with_page_size(view: FilteredView<'a>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ExplorerError::InvalidFilter(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            view,
            page_size,
            position: 0,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rows not yet emitted.
    pub fn remaining(&self) -> usize {
        self.view.iter().skip(self.position).count()
    }

    /// Next `page_size` rows, or fewer at the end. Never fails; once the end
    /// is reached every call returns an empty [`PageStatus::Exhausted`] page.
    pub fn next_page(&mut self) -> Page<'a> {
        let offset = self.position;
        // Take one extra row to learn whether anything follows this page.
        let mut rows: Vec<&'a TripRecord> = self
            .view
            .iter()
            .skip(offset)
            .take(self.page_size.saturating_add(1))
            .collect();

        let status = if rows.is_empty() {
            PageStatus::Exhausted
        } else if rows.len() > self.page_size {
            rows.truncate(self.page_size);
            PageStatus::More
        } else {
            PageStatus::Last
        };

        self.position += rows.len();
        Page {
            records: rows,
            status,
            offset,
        }
    }
}

impl<'a> Iterator for PageCursor<'a> {
    type Item = Page<'a>;

    /// Non-empty pages only.
    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page();
        match page.status {
            PageStatus::Exhausted => None,
            _ => Some(page),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{CityCapabilities, TripLog};
    use chrono::{Duration, NaiveDate};

    fn make_log(n: usize) -> TripLog {
        let start = NaiveDate::from_ymd_opt(2017, 2, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let records = (0..n)
            .map(|i| {
                TripRecord::new(
                    start + Duration::minutes(i as i64 * 17),
                    i as f64,
                    format!("Station {}", i),
                    "Depot",
                )
            })
            .collect();
        TripLog::new("washington", CityCapabilities::BASIC, records)
    }

    fn page_sizes(n: usize, page_size: usize) -> Vec<usize> {
        let log = make_log(n);
        let cursor = PageCursor::with_page_size(FilteredView::all(&log), page_size).unwrap();
        cursor.map(|p| p.records.len()).collect()
    }

    // ── next_page ─────────────────────────────────────────────────────────────

    #[test]
    fn test_page_counts_for_various_sizes() {
        for n in 0..=23 {
            let sizes = page_sizes(n, 5);
            assert_eq!(sizes.len(), n.div_ceil(5), "n = {n}");
            if let Some(&last) = sizes.last() {
                let expected = if n % 5 == 0 { 5 } else { n % 5 };
                assert_eq!(last, expected, "n = {n}");
            }
            assert_eq!(sizes.iter().sum::<usize>(), n);
        }
    }

    #[test]
    fn test_three_distinct_outcomes() {
        let log = make_log(7);
        let mut cursor = PageCursor::new(FilteredView::all(&log));

        let first = cursor.next_page();
        assert_eq!(first.status, PageStatus::More);
        assert_eq!(first.records.len(), 5);
        assert!(!first.is_end());

        let second = cursor.next_page();
        assert_eq!(second.status, PageStatus::Last);
        assert_eq!(second.records.len(), 2);
        assert_eq!(second.offset, 5);
        assert!(second.is_end());

        let third = cursor.next_page();
        assert_eq!(third.status, PageStatus::Exhausted);
        assert!(third.records.is_empty());
    }

    #[test]
    fn test_exact_multiple_ends_with_last_full_page() {
        let log = make_log(10);
        let mut cursor = PageCursor::new(FilteredView::all(&log));
        assert_eq!(cursor.next_page().status, PageStatus::More);
        let last = cursor.next_page();
        assert_eq!(last.status, PageStatus::Last);
        assert_eq!(last.records.len(), 5);
    }

    #[test]
    fn test_exhausted_repeats_forever() {
        let log = make_log(3);
        let mut cursor = PageCursor::new(FilteredView::all(&log));
        assert_eq!(cursor.next_page().status, PageStatus::Last);
        for _ in 0..5 {
            let page = cursor.next_page();
            assert_eq!(page.status, PageStatus::Exhausted);
            assert!(page.records.is_empty());
        }
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_empty_view_is_exhausted_immediately() {
        let log = make_log(0);
        let mut cursor = PageCursor::new(FilteredView::all(&log));
        assert_eq!(cursor.next_page().status, PageStatus::Exhausted);
    }

    #[test]
    fn test_pages_follow_view_order() {
        let log = make_log(12);
        let cursor = PageCursor::new(FilteredView::all(&log));
        let stations: Vec<String> = cursor
            .flat_map(|p| p.records.into_iter().map(|r| r.start_station.clone()))
            .collect();
        let expected: Vec<String> = (0..12).map(|i| format!("Station {}", i)).collect();
        assert_eq!(stations, expected);
    }

    // ── remaining ─────────────────────────────────────────────────────────────

    #[test]
    fn test_remaining_counts_down() {
        let log = make_log(8);
        let mut cursor = PageCursor::with_page_size(FilteredView::all(&log), 3).unwrap();
        assert_eq!(cursor.remaining(), 8);
        cursor.next_page();
        assert_eq!(cursor.remaining(), 5);
        let second = cursor.next_page();
        assert_eq!(second.records[0].start_station, "Station 3");
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let log = make_log(2);
        let err = PageCursor::with_page_size(FilteredView::all(&log), 0).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidFilter(_)));
    }

    #[test]
    fn test_huge_page_size_returns_everything() {
        let log = make_log(4);
        let mut cursor = PageCursor::with_page_size(FilteredView::all(&log), usize::MAX).unwrap();
        let page = cursor.next_page();
        assert_eq!(page.status, PageStatus::Last);
        assert_eq!(page.records.len(), 4);
        assert_eq!(cursor.next_page().status, PageStatus::Exhausted);
    }

    #[test]
    fn test_default_page_size() {
        let log = make_log(1);
        assert_eq!(PageCursor::new(FilteredView::all(&log)).page_size(), 5);
    }
}
