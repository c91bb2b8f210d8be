//! CSV trip-log loading.
//!
//! Turns one city's trip log into a [`TripLog`]. Loading is all-or-nothing:
//! the first bad row aborts the load with its row index.

use std::io::Read;
use std::path::Path;

use bikeshare_core::error::{ExplorerError, Result};
use bikeshare_core::models::{CityCapabilities, TripLog, TripRecord};
use bikeshare_core::registry::CityRegistry;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [
    START_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

/// Accepted naive timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve `city` in `registry` and load its trip log.
///
/// The log is named after the registry entry, not the text the user typed.
pub fn load_city(registry: &CityRegistry, city: &str) -> Result<TripLog> {
    let (name, source) = registry.lookup(city)?;
    load_trip_log(name, &source.path, source.capabilities)
}

/// Load the trip log at `path`.
///
/// The file is only held open for the duration of this call.
pub fn load_trip_log(city: &str, path: &Path, capabilities: CityCapabilities) -> Result<TripLog> {
    let file = std::fs::File::open(path).map_err(|source| ExplorerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let log = read_trip_log(city, capabilities, std::io::BufReader::new(file))?;
    debug!(
        "Loaded {} trips for {} from {}",
        log.len(),
        city,
        path.display()
    );
    Ok(log)
}

/// Parse a header-first CSV trip log from any reader.
pub fn read_trip_log<R: Read>(
    city: &str,
    capabilities: CityCapabilities,
    reader: R,
) -> Result<TripLog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    check_columns(city, capabilities, csv_reader.headers()?)?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<RawTripRow>().enumerate() {
        let raw = result.map_err(|e| ExplorerError::MalformedRecord {
            row,
            reason: e.to_string(),
        })?;
        let record = raw
            .into_record(capabilities)
            .map_err(|reason| ExplorerError::MalformedRecord { row, reason })?;
        records.push(record);
    }

    Ok(TripLog::new(city, capabilities, records))
}

/// Parse a trip-log timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (optionally with fractional seconds or a
/// `T` separator) and RFC 3339 strings; an offset, if present, is dropped and
/// the local wall-clock time kept.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One CSV row as written in the source file.
#[derive(Debug, Deserialize)]
struct RawTripRow {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTripRow {
    fn into_record(self, capabilities: CityCapabilities) -> std::result::Result<TripRecord, String> {
        let start_time = parse_timestamp(&self.start_time)
            .ok_or_else(|| format!("unparseable {} {:?}", START_TIME, self.start_time))?;

        let end_time = match self.end_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                parse_timestamp(s).ok_or_else(|| format!("unparseable {} {:?}", END_TIME, s))?,
            ),
        };

        if !self.trip_duration.is_finite() || self.trip_duration < 0.0 {
            return Err(format!(
                "{} must be a non-negative number, got {}",
                TRIP_DURATION, self.trip_duration
            ));
        }
        if self.start_station.is_empty() {
            return Err(format!("blank {}", START_STATION));
        }
        if self.end_station.is_empty() {
            return Err(format!("blank {}", END_STATION));
        }

        let gender = if capabilities.gender {
            non_blank(self.gender)
        } else {
            None
        };
        let birth_year = match self.birth_year {
            Some(year) if capabilities.birth_year => Some(to_year(year)?),
            _ => None,
        };

        Ok(TripRecord::new(
            start_time,
            self.trip_duration,
            self.start_station,
            self.end_station,
        )
        .with_end_time(end_time)
        .with_user_type(non_blank(self.user_type))
        .with_gender(gender)
        .with_birth_year(birth_year))
    }
}

/// Fail when a column the city's schema promises is absent from the header.
fn check_columns(
    city: &str,
    capabilities: CityCapabilities,
    headers: &csv::StringRecord,
) -> Result<()> {
    let mut required: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    if capabilities.gender {
        required.push(GENDER);
    }
    if capabilities.birth_year {
        required.push(BIRTH_YEAR);
    }

    match required
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        Some(column) => Err(ExplorerError::MissingColumn {
            city: city.to_string(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Birth years are stored as floats (`1989.0`) in the published files.
fn to_year(value: f64) -> std::result::Result<i32, String> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(i32::MAX) {
        return Err(format!("{} must be a whole year, got {}", BIRTH_YEAR, value));
    }
    Ok(value as i32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::Weekday;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const CHICAGO_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";
    const WASHINGTON_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

    fn csv_text(header: &str, rows: &[&str]) -> String {
        let mut text = String::from(header);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", csv_text(header, rows)).unwrap();
        path
    }

    fn read_chicago(rows: &[&str]) -> Result<TripLog> {
        read_trip_log(
            "chicago",
            CityCapabilities::FULL,
            csv_text(CHICAGO_HEADER, rows).as_bytes(),
        )
    }

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2017-01-01 09:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 09:07:57.123").is_some());
        assert!(parse_timestamp("2017-01-01T09:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 09:07").is_some());
        assert!(parse_timestamp("2017-01-01T09:07:57-05:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2017-13-01 09:07:57").is_none());
    }

    #[test]
    fn test_parse_timestamp_keeps_wall_clock() {
        let ts = parse_timestamp("2017-06-23T15:09:32+02:00").unwrap();
        assert_eq!(ts.to_string(), "2017-06-23 15:09:32");
    }

    // ── read_trip_log ─────────────────────────────────────────────────────────

    #[test]
    fn test_read_chicago_rows() {
        let log = read_chicago(&[
            "1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0",
            "955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0",
        ])
        .unwrap();

        assert_eq!(log.city(), "chicago");
        assert_eq!(log.len(), 2);

        let first = &log.records()[0];
        assert_eq!(first.month, 6);
        assert_eq!(first.weekday, Weekday::Friday);
        assert_eq!(first.hour, 15);
        assert_eq!(first.trip_duration_seconds, 321.0);
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.user_type.as_deref(), Some("Subscriber"));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert!(first.end_time.is_some());
    }

    #[test]
    fn test_read_keeps_source_order() {
        let log = read_chicago(&[
            "1,2017-06-01 10:00:00,,60,B,C,Subscriber,Male,1980",
            "2,2017-01-01 10:00:00,,60,A,C,Subscriber,Male,1980",
        ])
        .unwrap();
        assert_eq!(log.records()[0].start_station, "B");
        assert_eq!(log.records()[1].start_station, "A");
    }

    #[test]
    fn test_read_blank_optional_cells() {
        let log = read_chicago(&["1,2017-03-04 08:00:00,,600,A,B,,,"]).unwrap();
        let record = &log.records()[0];
        assert!(record.end_time.is_none());
        assert!(record.user_type.is_none());
        assert!(record.gender.is_none());
        assert!(record.birth_year.is_none());
    }

    #[test]
    fn test_read_washington_without_demographics() {
        let text = csv_text(
            WASHINGTON_HEADER,
            &["1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber"],
        );
        let log = read_trip_log("washington", CityCapabilities::BASIC, text.as_bytes()).unwrap();
        assert_eq!(log.len(), 1);
        assert!((log.records()[0].trip_duration_seconds - 489.066).abs() < 1e-9);
        assert!(log.records()[0].gender.is_none());
    }

    #[test]
    fn test_read_ignores_demographics_when_not_supported() {
        let text = csv_text(CHICAGO_HEADER, &["1,2017-03-04 08:00:00,,600,A,B,Customer,Male,1990"]);
        let log = read_trip_log("somewhere", CityCapabilities::BASIC, text.as_bytes()).unwrap();
        assert!(log.records()[0].gender.is_none());
        assert!(log.records()[0].birth_year.is_none());
    }

    #[test]
    fn test_read_missing_required_column() {
        let text = csv_text(
            "Start Time,Trip Duration,Start Station,End Station",
            &["2017-03-04 08:00:00,600,A,B"],
        );
        let err = read_trip_log("washington", CityCapabilities::BASIC, text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::MissingColumn { ref column, .. } if column == "User Type"
        ));
    }

    #[test]
    fn test_read_missing_capability_column() {
        let text = csv_text(WASHINGTON_HEADER, &[]);
        let err = read_trip_log("chicago", CityCapabilities::FULL, text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::MissingColumn { ref column, .. } if column == "Gender"
        ));
    }

    #[test]
    fn test_read_empty_log() {
        let log = read_chicago(&[]).unwrap();
        assert!(log.is_empty());
    }

    // ── Malformed rows ────────────────────────────────────────────────────────

    #[test]
    fn test_bad_start_time_reports_row_index() {
        let err = read_chicago(&[
            "1,2017-03-04 08:00:00,,600,A,B,Subscriber,Male,1990",
            "2,2017-03-04 09:00:00,,600,A,B,Subscriber,Male,1990",
            "3,not a date,,600,A,B,Subscriber,Male,1990",
        ])
        .unwrap_err();
        match err {
            ExplorerError::MalformedRecord { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("Start Time"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_duration_is_malformed() {
        let err = read_chicago(&["1,2017-03-04 08:00:00,,abc,A,B,Subscriber,Male,1990"]).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn test_negative_duration_is_malformed() {
        let err = read_chicago(&["1,2017-03-04 08:00:00,,-5,A,B,Subscriber,Male,1990"]).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn test_blank_station_is_malformed() {
        let err = read_chicago(&[
            "1,2017-03-04 08:00:00,,60,A,B,Subscriber,Male,1990",
            "2,2017-03-04 08:00:00,,60,,B,Subscriber,Male,1990",
        ])
        .unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 1, .. }));
    }

    #[test]
    fn test_fractional_birth_year_is_malformed() {
        let err = read_chicago(&["1,2017-03-04 08:00:00,,60,A,B,Subscriber,Male,1990.5"]).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn test_bad_end_time_is_malformed() {
        let err = read_chicago(&["1,2017-03-04 08:00:00,later,60,A,B,Subscriber,Male,1990"]).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = read_chicago(&["1,2017-03-04 08:00:00,,60"]).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedRecord { row: 0, .. }));
    }

    // ── load_trip_log / load_city ─────────────────────────────────────────────

    #[test]
    fn test_load_city_via_registry() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "washington.csv",
            WASHINGTON_HEADER,
            &["1,2017-01-02 07:00:00,2017-01-02 07:10:00,600,A,B,Customer"],
        );
        let registry = CityRegistry::bundled(dir.path());

        let log = load_city(&registry, " Washington ").unwrap();
        assert_eq!(log.city(), "washington");
        assert_eq!(log.len(), 1);
        assert_eq!(log.capabilities(), CityCapabilities::BASIC);

        let shouted = load_city(&registry, "WASHINGTON").unwrap();
        assert_eq!(shouted.city(), log.city());
    }

    #[test]
    fn test_load_city_unknown() {
        let dir = TempDir::new().unwrap();
        let registry = CityRegistry::bundled(dir.path());
        let err = load_city(&registry, "boston").unwrap_err();
        assert!(matches!(err, ExplorerError::UnknownCity(_)));
    }

    #[test]
    fn test_load_trip_log_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_trip_log(
            "chicago",
            &dir.path().join("chicago.csv"),
            CityCapabilities::FULL,
        )
        .unwrap_err();
        assert!(matches!(err, ExplorerError::FileRead { .. }));
    }
}
