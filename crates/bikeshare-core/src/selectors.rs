//! Month and weekday selectors, and the vocabulary that turns user text into
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ExplorerError, Result};
use crate::models::{month_name, Weekday, MONTH_NAMES};

/// Word that means "no filter" for both selectors.
pub const ANY_KEYWORD: &str = "all";

/// Month filter: every month, or one calendar month (1–12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthSelector {
    #[default]
    Any,
    Month(u32),
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSelector::Any => f.write_str("All"),
            MonthSelector::Month(m) => match month_name(*m) {
                Some(name) => f.write_str(name),
                None => write!(f, "Month {}", m),
            },
        }
    }
}

/// Weekday filter: every day, or one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdaySelector {
    #[default]
    Any,
    Day(Weekday),
}

impl fmt::Display for WeekdaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdaySelector::Any => f.write_str("All"),
            WeekdaySelector::Day(day) => f.write_str(day.name()),
        }
    }
}

// ── SelectorVocabulary ────────────────────────────────────────────────────────

/// The month and day names offered to the user.
///
/// Replaces fixed global name lists: the session layer asks the vocabulary
/// which choices to show and hands it the user's answers to normalise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorVocabulary {
    /// Months that may be chosen, as numbers 1–12, in display order.
    pub months: Vec<u32>,
    /// Weekdays that may be chosen, in display order.
    pub days: Vec<Weekday>,
}

impl Default for SelectorVocabulary {
    fn default() -> Self {
        Self {
            months: (1..=12).collect(),
            days: Weekday::ALL.to_vec(),
        }
    }
}

impl SelectorVocabulary {
    /// Vocabulary restricted to the first `n` months of the year.
    ///
    /// The published trip logs only cover January through June, so
    /// `first_months(6)` offers exactly the months that have data.
    pub fn first_months(n: u32) -> Result<Self> {
        if n == 0 || n > 12 {
            return Err(ExplorerError::Config(format!(
                "month count must be between 1 and 12, got {}",
                n
            )));
        }
        Ok(Self {
            months: (1..=n).collect(),
            ..Self::default()
        })
    }

    /// Title-case names of the offered months.
    pub fn month_labels(&self) -> Vec<&'static str> {
        self.months.iter().filter_map(|m| month_name(*m)).collect()
    }

    /// Title-case names of the offered days.
    pub fn day_labels(&self) -> Vec<&'static str> {
        self.days.iter().map(|d| d.name()).collect()
    }

    /// Parse a month answer: `"all"` or an offered month name, any case.
    pub fn parse_month(&self, input: &str) -> Result<MonthSelector> {
        let lower = input.trim().to_lowercase();
        if lower == ANY_KEYWORD {
            return Ok(MonthSelector::Any);
        }
        MONTH_NAMES
            .iter()
            .position(|name| name.to_lowercase() == lower)
            .map(|idx| idx as u32 + 1)
            .filter(|month| self.months.contains(month))
            .map(MonthSelector::Month)
            .ok_or_else(|| ExplorerError::InvalidFilter(format!("unknown month {:?}", input)))
    }

    /// Parse a weekday answer: `"all"` or an offered day name, any case.
    pub fn parse_day(&self, input: &str) -> Result<WeekdaySelector> {
        if input.trim().eq_ignore_ascii_case(ANY_KEYWORD) {
            return Ok(WeekdaySelector::Any);
        }
        let day: Weekday = input.parse().map_err(ExplorerError::InvalidFilter)?;
        if !self.days.contains(&day) {
            return Err(ExplorerError::InvalidFilter(format!(
                "{} is not an offered day",
                day
            )));
        }
        Ok(WeekdaySelector::Day(day))
    }
}
