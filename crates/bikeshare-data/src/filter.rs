//! Month/weekday filtering of a trip log.
//!
//! A [`FilteredView`] borrows its [`TripLog`] and evaluates the predicate on
//! every pass; it never copies or reorders records.

use bikeshare_core::error::{ExplorerError, Result};
use bikeshare_core::models::{CityCapabilities, TripLog, TripRecord};
use bikeshare_core::selectors::{MonthSelector, WeekdaySelector};
use serde::{Deserialize, Serialize};

// ── TripFilter ────────────────────────────────────────────────────────────────

/// A validated month AND weekday predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripFilter {
    month: MonthSelector,
    day: WeekdaySelector,
}

impl TripFilter {
    /// Build a filter, rejecting months outside 1–12.
    pub fn new(month: MonthSelector, day: WeekdaySelector) -> Result<Self> {
        if let MonthSelector::Month(m) = month {
            if !(1..=12).contains(&m) {
                return Err(ExplorerError::InvalidFilter(format!(
                    "month {} is out of range 1-12",
                    m
                )));
            }
        }
        Ok(Self { month, day })
    }

    /// The filter that keeps every record.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn month(&self) -> MonthSelector {
        self.month
    }

    pub fn day(&self) -> WeekdaySelector {
        self.day
    }

    /// Whether `record` passes both selectors.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let month_ok = match self.month {
            MonthSelector::Any => true,
            MonthSelector::Month(m) => record.month == m,
        };
        let day_ok = match self.day {
            WeekdaySelector::Any => true,
            WeekdaySelector::Day(d) => record.weekday == d,
        };
        month_ok && day_ok
    }

    /// Apply the filter to `log`.
    pub fn apply<'a>(&self, log: &'a TripLog) -> FilteredView<'a> {
        FilteredView { log, filter: *self }
    }
}

// ── FilteredView ──────────────────────────────────────────────────────────────

/// The records of a [`TripLog`] that pass a [`TripFilter`], in log order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    log: &'a TripLog,
    filter: TripFilter,
}

impl<'a> FilteredView<'a> {
    /// Unfiltered view of the whole log.
    pub fn all(log: &'a TripLog) -> Self {
        TripFilter::any().apply(log)
    }

    pub fn filter(&self) -> TripFilter {
        self.filter
    }

    pub fn city(&self) -> &'a str {
        self.log.city()
    }

    pub fn capabilities(&self) -> CityCapabilities {
        self.log.capabilities()
    }

    /// Matching records, lazily, in log order.
    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + Clone + 'a {
        let filter = self.filter;
        self.log.records().iter().filter(move |r| filter.matches(r))
    }

    /// Number of matching records. Walks the log.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
