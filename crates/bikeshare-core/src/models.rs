use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Title-case name of calendar month `month` (1–12).
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// Day of the week, ordered Monday first.
///
/// The derived `Ord` is the ISO order, which is also the tie-break order for
/// "most common weekday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Title-case display name, e.g. `"Monday"`.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Case-insensitive; accepts the full name or its three-letter prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_lowercase();
                name == lower || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| format!("unknown weekday {:?}", s))
    }
}

/// Which optional demographic columns a city's trip log carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCapabilities {
    /// The log has a `Gender` column.
    #[serde(default)]
    pub gender: bool,
    /// The log has a `Birth Year` column.
    #[serde(default)]
    pub birth_year: bool,
}

impl CityCapabilities {
    /// Both demographic columns present (Chicago, New York City).
    pub const FULL: CityCapabilities = CityCapabilities {
        gender: true,
        birth_year: true,
    };

    /// No demographic columns (Washington).
    pub const BASIC: CityCapabilities = CityCapabilities {
        gender: false,
        birth_year: false,
    };

    /// Whether user demographics can be computed at all.
    pub fn has_demographics(&self) -> bool {
        self.gender && self.birth_year
    }
}

/// One trip read from a city's trip log.
///
/// `month`, `weekday` and `hour` are derived from `start_time` by
/// [`TripRecord::new`] and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// When the trip started.
    pub start_time: NaiveDateTime,
    /// When the trip ended, if the log records it.
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Trip length in seconds, never negative.
    pub trip_duration_seconds: f64,
    /// Station the trip started from.
    pub start_station: String,
    /// Station the trip ended at.
    pub end_station: String,
    /// Rider category, e.g. `"Subscriber"`. `None` for a blank cell.
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    /// Calendar month of `start_time`, 1–12.
    pub month: u32,
    /// Weekday of `start_time`.
    pub weekday: Weekday,
    /// Hour of `start_time`, 0–23.
    pub hour: u32,
}

impl TripRecord {
    /// Build a record and derive its temporal fields from `start_time`.
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration_seconds: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            trip_duration_seconds,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday().into(),
            hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Directional station pair for this trip.
    pub fn route(&self) -> Route {
        Route {
            start: self.start_station.clone(),
            end: self.end_station.clone(),
        }
    }
}

/// A start → end station pair. `A → B` and `B → A` are distinct routes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub start: String,
    pub end: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FROM {} TO {}", self.start, self.end)
    }
}

/// All trips of one city, in source order. Immutable once built.
#[derive(Debug, Clone)]
pub struct TripLog {
    city: String,
    capabilities: CityCapabilities,
    records: Vec<TripRecord>,
}

impl TripLog {
    pub fn new(
        city: impl Into<String>,
        capabilities: CityCapabilities,
        records: Vec<TripRecord>,
    ) -> Self {
        Self {
            city: city.into(),
            capabilities,
            records,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn capabilities(&self) -> CityCapabilities {
        self.capabilities
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
