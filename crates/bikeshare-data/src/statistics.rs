//! The four statistic groups over a view: travel times, stations, trip
//! durations and users.
//!
//! Every group is computed independently from a [`FilteredView`] and returns
//! a plain serialisable struct. None of them fail: an empty view yields
//! `None` modes, a zero total and no mean.

use bikeshare_core::frequency::{FrequencyTable, ModeValue};
use bikeshare_core::models::{Route, Weekday};
use serde::{Deserialize, Serialize};

use crate::filter::{FilteredView, TripFilter};

// ── Result types ──────────────────────────────────────────────────────────────

/// Most common travel times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub popular_month: Option<ModeValue<u32>>,
    pub popular_weekday: Option<ModeValue<Weekday>>,
    pub popular_hour: Option<ModeValue<u32>>,
}

/// Most popular stations and route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    pub popular_start_station: Option<ModeValue<String>>,
    pub popular_end_station: Option<ModeValue<String>>,
    pub popular_route: Option<ModeValue<Route>>,
}

/// Total and average trip duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: f64,
    /// `None` when the view is empty.
    pub mean_seconds: Option<f64>,
}

impl DurationStats {
    pub fn total_hours(&self) -> f64 {
        self.total_seconds / 3_600.0
    }
}

/// Rider breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Count per user type, most common first.
    pub user_types: Vec<ModeValue<String>>,
    pub demographics: Demographics,
}

/// Gender and birth-year statistics, when the city records them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Demographics {
    /// The city's trip log has no gender/birth-year columns.
    Unsupported { city: String },
    Available {
        /// Count per gender, most common first.
        genders: Vec<ModeValue<String>>,
        /// `None` when no trip in the view has a birth year.
        birth_years: Option<BirthYearStats>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: ModeValue<i32>,
}

/// All four groups for one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub city: String,
    pub filter: TripFilter,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

// ── TripStatistics ────────────────────────────────────────────────────────────

/// Stateless helper computing statistic groups over a view.
pub struct TripStatistics;

impl TripStatistics {
    /// Most common month, weekday and start hour.
    pub fn time_stats(view: &FilteredView<'_>) -> TimeStats {
        let mut months = FrequencyTable::new();
        let mut weekdays = FrequencyTable::new();
        let mut hours = FrequencyTable::new();
        for record in view.iter() {
            months.add(record.month);
            weekdays.add(record.weekday);
            hours.add(record.hour);
        }
        TimeStats {
            popular_month: months.mode(),
            popular_weekday: weekdays.mode(),
            popular_hour: hours.mode(),
        }
    }

    /// Most common start station, end station and start → end route.
    pub fn station_stats(view: &FilteredView<'_>) -> StationStats {
        let mut starts: FrequencyTable<&str> = FrequencyTable::new();
        let mut ends: FrequencyTable<&str> = FrequencyTable::new();
        let mut routes: FrequencyTable<(&str, &str)> = FrequencyTable::new();
        for record in view.iter() {
            starts.add(&record.start_station);
            ends.add(&record.end_station);
            routes.add((record.start_station.as_str(), record.end_station.as_str()));
        }
        StationStats {
            popular_start_station: starts.mode().map(owned),
            popular_end_station: ends.mode().map(owned),
            popular_route: routes.mode().map(|m| ModeValue {
                value: Route {
                    start: m.value.0.to_string(),
                    end: m.value.1.to_string(),
                },
                count: m.count,
            }),
        }
    }

    /// Sum and mean of trip durations.
    ///
    /// Durations are summed in ascending order so the result does not depend
    /// on the order of the log.
    pub fn duration_stats(view: &FilteredView<'_>) -> DurationStats {
        let mut durations: Vec<f64> = view.iter().map(|r| r.trip_duration_seconds).collect();
        durations.sort_by(f64::total_cmp);
        let trip_count = durations.len();
        let total_seconds: f64 = durations.iter().sum();
        let mean_seconds = (trip_count > 0).then(|| total_seconds / trip_count as f64);
        DurationStats {
            trip_count,
            total_seconds,
            mean_seconds,
        }
    }

    /// User-type counts, plus gender and birth-year statistics when the
    /// city's capabilities include them.
    pub fn user_stats(view: &FilteredView<'_>) -> UserStats {
        let user_types: FrequencyTable<&str> =
            view.iter().filter_map(|r| r.user_type.as_deref()).collect();

        let demographics = if view.capabilities().has_demographics() {
            Self::demographics(view)
        } else {
            Demographics::Unsupported {
                city: view.city().to_string(),
            }
        };

        UserStats {
            user_types: user_types.distribution().into_iter().map(owned).collect(),
            demographics,
        }
    }

    /// Every group at once.
    pub fn summarize(view: &FilteredView<'_>) -> ViewSummary {
        ViewSummary {
            city: view.city().to_string(),
            filter: view.filter(),
            time: Self::time_stats(view),
            stations: Self::station_stats(view),
            durations: Self::duration_stats(view),
            users: Self::user_stats(view),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn demographics(view: &FilteredView<'_>) -> Demographics {
        let genders: FrequencyTable<&str> =
            view.iter().filter_map(|r| r.gender.as_deref()).collect();
        let years: FrequencyTable<i32> = view.iter().filter_map(|r| r.birth_year).collect();

        let birth_years = match (years.bounds(), years.mode()) {
            (Some((earliest, most_recent)), Some(most_common)) => Some(BirthYearStats {
                earliest,
                most_recent,
                most_common,
            }),
            _ => None,
        };

        Demographics::Available {
            genders: genders.distribution().into_iter().map(owned).collect(),
            birth_years,
        }
    }
}

fn owned(m: ModeValue<&str>) -> ModeValue<String> {
    ModeValue {
        value: m.value.to_string(),
        count: m.count,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
