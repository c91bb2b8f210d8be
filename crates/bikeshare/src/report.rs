//! Console rendering of filters, raw-row pages and statistic groups.
//!
//! Every function returns the text instead of printing it, so the session
//! decides where it goes.

use bikeshare_core::formatting::{
    format_count, format_duration, format_number, percentage, title_case,
};
use bikeshare_core::frequency::ModeValue;
use bikeshare_core::models::{month_name, CityCapabilities, TripRecord};
use bikeshare_data::filter::TripFilter;
use bikeshare_data::pagination::Page;
use bikeshare_data::statistics::{
    Demographics, DurationStats, StationStats, TimeStats, UserStats,
};

pub const RULE: &str = "----------------------------------------";

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
const STATION_WIDTH: usize = 32;

/// The "Your filter settings" block.
pub fn render_filters(city: &str, filter: &TripFilter) -> String {
    [
        RULE.to_string(),
        "Your filter settings:".to_string(),
        String::new(),
        format!("City: {}", title_case(city)),
        format!("Month: {}", filter.month()),
        format!("Day of Week: {}", filter.day()),
        RULE.to_string(),
    ]
    .join("\n")
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// One column of the raw-row table.
struct Column {
    header: &'static str,
    width: usize,
    right_aligned: bool,
    cell: fn(&TripRecord) -> String,
}

/// Every field a record carries; gender and birth year only when the city
/// records them.
fn page_columns(capabilities: CityCapabilities) -> Vec<Column> {
    let mut columns = vec![
        Column {
            header: "Start Time",
            width: 19,
            right_aligned: false,
            cell: |r| r.start_time.format(TIMESTAMP).to_string(),
        },
        Column {
            header: "End Time",
            width: 19,
            right_aligned: false,
            cell: |r| {
                r.end_time
                    .map(|t| t.format(TIMESTAMP).to_string())
                    .unwrap_or_else(|| "-".to_string())
            },
        },
        Column {
            header: "Trip Duration",
            width: 13,
            right_aligned: true,
            cell: |r| r.trip_duration_seconds.to_string(),
        },
        Column {
            header: "Start Station",
            width: STATION_WIDTH,
            right_aligned: false,
            cell: |r| r.start_station.clone(),
        },
        Column {
            header: "End Station",
            width: STATION_WIDTH,
            right_aligned: false,
            cell: |r| r.end_station.clone(),
        },
        Column {
            header: "User Type",
            width: 10,
            right_aligned: false,
            cell: |r| r.user_type.clone().unwrap_or_else(|| "-".to_string()),
        },
    ];
    if capabilities.gender {
        columns.push(Column {
            header: "Gender",
            width: 6,
            right_aligned: false,
            cell: |r| r.gender.clone().unwrap_or_else(|| "-".to_string()),
        });
    }
    if capabilities.birth_year {
        columns.push(Column {
            header: "Birth Year",
            width: 10,
            right_aligned: true,
            cell: |r| {
                r.birth_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string())
            },
        });
    }
    columns
}

/// A page of raw rows as an aligned table, numbered by view position.
pub fn render_page(page: &Page<'_>, capabilities: CityCapabilities) -> String {
    let columns = page_columns(capabilities);

    let mut header = vec![format!("{:>6}", "#")];
    header.extend(columns.iter().map(|c| pad(c.header, c.width, c.right_aligned)));

    let mut lines = vec![header.join("  ").trim_end().to_string()];
    for (i, record) in page.records.iter().enumerate() {
        let mut cells = vec![format!("{:>6}", page.offset + i)];
        cells.extend(
            columns
                .iter()
                .map(|c| pad(&(c.cell)(record), c.width, c.right_aligned)),
        );
        lines.push(cells.join("  ").trim_end().to_string());
    }
    lines.join("\n")
}

// ── Statistic groups ──────────────────────────────────────────────────────────

pub fn render_time_stats(stats: &TimeStats) -> String {
    let month = stats
        .popular_month
        .as_ref()
        .map(|m| mode_label(month_name(m.value).unwrap_or("?"), m.count));
    let day = stats
        .popular_weekday
        .as_ref()
        .map(|m| mode_label(m.value.name(), m.count));
    let hour = stats
        .popular_hour
        .as_ref()
        .map(|m| mode_label(&format!("{:02}:00", m.value), m.count));

    [
        format!("Most Common Month: {}", or_none(month)),
        format!("Most Common Week Day: {}", or_none(day)),
        format!("Most Frequent Start Hour: {}", or_none(hour)),
    ]
    .join("\n")
}

pub fn render_station_stats(stats: &StationStats) -> String {
    let start = stats
        .popular_start_station
        .as_ref()
        .map(|m| mode_label(&m.value, m.count));
    let end = stats
        .popular_end_station
        .as_ref()
        .map(|m| mode_label(&m.value, m.count));
    let route = stats
        .popular_route
        .as_ref()
        .map(|m| mode_label(&m.value.to_string(), m.count));

    [
        format!("Most popular start station: {}", or_none(start)),
        format!("Most popular end station: {}", or_none(end)),
        format!(
            "Most popular combination of start and end station: {}",
            or_none(route)
        ),
    ]
    .join("\n")
}

pub fn render_duration_stats(stats: &DurationStats) -> String {
    let total = format!(
        "Total travel time: {} seconds or {} hours ({} trips)",
        format_number(stats.total_seconds, 0),
        format_number(stats.total_hours(), 1),
        format_count(stats.trip_count)
    );
    let mean = match stats.mean_seconds {
        Some(mean) => format!(
            "Mean travel time: {} seconds ({})",
            format_number(mean, 1),
            format_duration(mean)
        ),
        None => "Mean travel time: n/a (no trips match the filters)".to_string(),
    };
    format!("{}\n{}", total, mean)
}

pub fn render_user_stats(stats: &UserStats) -> String {
    let mut lines = vec![
        "Counts of user types:".to_string(),
        render_distribution(&stats.user_types),
        String::new(),
    ];

    match &stats.demographics {
        Demographics::Unsupported { city } => {
            lines.push(format!(
                "We don't have data about gender or birth year for {}.",
                title_case(city)
            ));
        }
        Demographics::Available {
            genders,
            birth_years,
        } => {
            lines.push("Counts of gender:".to_string());
            lines.push(render_distribution(genders));
            lines.push(String::new());
            match birth_years {
                Some(years) => {
                    lines.push(format!("Earliest birth year: {}", years.earliest));
                    lines.push(format!("Most recent birth year: {}", years.most_recent));
                    lines.push(format!(
                        "Most common birth year: {}",
                        mode_label(
                            &years.most_common.value.to_string(),
                            years.most_common.count
                        )
                    ));
                }
                None => lines.push("No birth years recorded for these trips.".to_string()),
            }
        }
    }
    lines.join("\n")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Aligned columns: value, count, share of the listed total.
fn render_distribution(entries: &[ModeValue<String>]) -> String {
    if entries.is_empty() {
        return "  (none)".to_string();
    }
    let total: usize = entries.iter().map(|e| e.count).sum();
    let width = entries.iter().map(|e| e.value.chars().count()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| {
            format!(
                "  {:<width$}  {:>9}  {:>5.1}%",
                e.value,
                format_count(e.count),
                percentage(e.count as f64, total as f64, 1),
                width = width
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn mode_label(value: &str, count: usize) -> String {
    format!("{} (count: {})", value, format_count(count))
}

fn or_none(label: Option<String>) -> String {
    label.unwrap_or_else(|| "none (no trips match the filters)".to_string())
}

fn pad(text: &str, width: usize, right_aligned: bool) -> String {
    let text = truncate(text, width);
    if right_aligned {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

// ── Tests ─────────────────────────────────────────────────────────────────────
