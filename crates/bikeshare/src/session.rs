//! The question-and-answer loop around the explorer.

use std::io::Write;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use bikeshare_core::formatting::title_case;
use bikeshare_core::models::TripLog;
use bikeshare_core::registry::CityRegistry;
use bikeshare_core::selectors::{MonthSelector, SelectorVocabulary, WeekdaySelector, ANY_KEYWORD};
use bikeshare_core::settings::Settings;
use bikeshare_data::filter::{FilteredView, TripFilter};
use bikeshare_data::pagination::PageCursor;
use bikeshare_data::reader;
use bikeshare_data::statistics::TripStatistics;
use dialoguer::{Confirm, Select};

use crate::report;

/// How the user wants to narrow the trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Month,
    Day,
    Both,
    None,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [Self::Month, Self::Day, Self::Both, Self::None];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Day => "day",
            Self::Both => "both",
            Self::None => "not at all",
        }
    }

    pub fn asks_month(self) -> bool {
        matches!(self, Self::Month | Self::Both)
    }

    pub fn asks_day(self) -> bool {
        matches!(self, Self::Day | Self::Both)
    }
}

pub struct Session<'s> {
    settings: &'s Settings,
    registry: CityRegistry,
    vocabulary: SelectorVocabulary,
}

impl<'s> Session<'s> {
    pub fn new(settings: &'s Settings) -> Result<Self> {
        let registry = settings.city_registry()?;
        if registry.is_empty() {
            bail!("no cities are registered");
        }
        Ok(Self {
            settings,
            registry,
            vocabulary: settings.vocabulary()?,
        })
    }

    /// Answer one query from the command line without prompting.
    pub fn run_once(&self) -> Result<()> {
        let city = self
            .settings
            .city
            .as_deref()
            .context("--city is required with --no-interactive")?;
        let filter = filter_from_args(
            &self.vocabulary,
            self.settings.month.as_deref(),
            self.settings.day.as_deref(),
        )?;

        let log = self.load(city)?;
        let view = filter.apply(&log);
        let mut stdout = std::io::stdout().lock();
        if !self.settings.wants_json() {
            writeln!(stdout, "{}", report::render_filters(log.city(), &filter))?;
        }
        write_statistics(&mut stdout, &view, self.settings.wants_json())
    }

    /// Prompt for a city and filters, show rows and statistics, and offer
    /// to start over. Values given on the command line answer the first
    /// round's questions.
    pub fn run_interactive(&self) -> Result<()> {
        println!("Hello! Let's explore some US bikeshare data!");
        let mut first_round = true;

        loop {
            let (city, filter) = if first_round {
                self.first_round_choices()?
            } else {
                (self.ask_city()?, self.ask_filter()?)
            };
            first_round = false;

            println!("{}", report::render_filters(&city, &filter));
            let log = self.load(&city)?;
            let view = filter.apply(&log);

            self.browse_rows(view)?;
            write_statistics(&mut std::io::stdout().lock(), &view, self.settings.wants_json())?;

            let again = Confirm::new()
                .with_prompt("Would you like to restart?")
                .default(false)
                .interact()?;
            if !again {
                break;
            }
        }
        Ok(())
    }

    // ── Prompts ───────────────────────────────────────────────────────────────

    fn first_round_choices(&self) -> Result<(String, TripFilter)> {
        let city = match self.settings.city.as_deref() {
            Some(city) => self.registry.lookup(city)?.0.to_string(),
            None => self.ask_city()?,
        };

        let filter = if self.settings.month.is_some() || self.settings.day.is_some() {
            filter_from_args(
                &self.vocabulary,
                self.settings.month.as_deref(),
                self.settings.day.as_deref(),
            )?
        } else {
            self.ask_filter()?
        };
        Ok((city, filter))
    }

    fn ask_city(&self) -> Result<String> {
        let cities: Vec<&str> = self.registry.cities().collect();
        let labels: Vec<String> = cities.iter().map(|c| title_case(c)).collect();
        let idx = Select::new()
            .with_prompt("Would you like to see data for which city?")
            .items(&labels)
            .default(0)
            .interact()?;
        Ok(cities[idx].to_string())
    }

    fn ask_filter(&self) -> Result<TripFilter> {
        let labels: Vec<&str> = FilterMode::ALL.iter().map(FilterMode::label).collect();
        let idx = Select::new()
            .with_prompt("Would you like to filter the data by month, day, both or not at all?")
            .items(&labels)
            .default(3)
            .interact()?;
        let mode = FilterMode::ALL[idx];

        let month = if mode.asks_month() {
            let labels = with_any(self.vocabulary.month_labels());
            let idx = Select::new()
                .with_prompt("Which month?")
                .items(&labels)
                .default(0)
                .interact()?;
            self.vocabulary.parse_month(labels[idx])?
        } else {
            MonthSelector::Any
        };

        let day = if mode.asks_day() {
            let labels = with_any(self.vocabulary.day_labels());
            let idx = Select::new()
                .with_prompt("Which day?")
                .items(&labels)
                .default(0)
                .interact()?;
            self.vocabulary.parse_day(labels[idx])?
        } else {
            WeekdaySelector::Any
        };

        Ok(TripFilter::new(month, day)?)
    }

    fn browse_rows(&self, view: FilteredView<'_>) -> Result<()> {
        if view.is_empty() {
            println!("No trips match these filters.");
            return Ok(());
        }
        tracing::debug!("{} trips match {:?}", view.len(), view.filter());

        let mut cursor = PageCursor::with_page_size(view, self.settings.page_size())?;
        let wants_rows = Confirm::new()
            .with_prompt(format!(
                "Would you like to see {} lines of raw data?",
                cursor.page_size()
            ))
            .default(false)
            .interact()?;
        if !wants_rows {
            return Ok(());
        }

        loop {
            let page = cursor.next_page();
            if !page.records.is_empty() {
                println!("{}", report::render_page(&page, view.capabilities()));
            }
            if page.is_end() {
                println!("You reached the end of the table!");
                return Ok(());
            }
            let more = Confirm::new()
                .with_prompt(format!(
                    "Would you like to see {} more lines? ({} left)",
                    cursor.page_size(),
                    cursor.remaining()
                ))
                .default(false)
                .interact()?;
            if !more {
                return Ok(());
            }
        }
    }

    fn load(&self, city: &str) -> Result<TripLog> {
        let started = Instant::now();
        let log = reader::load_city(&self.registry, city)
            .with_context(|| format!("could not load trips for {}", title_case(city.trim())))?;
        tracing::info!(
            "Loaded {} trips for {} in {:.3}s",
            log.len(),
            log.city(),
            started.elapsed().as_secs_f64()
        );
        Ok(log)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a filter from optional `--month` / `--day` answers; missing ones
/// mean "all".
pub fn filter_from_args(
    vocabulary: &SelectorVocabulary,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<TripFilter> {
    let month = vocabulary.parse_month(month.unwrap_or(ANY_KEYWORD))?;
    let day = vocabulary.parse_day(day.unwrap_or(ANY_KEYWORD))?;
    Ok(TripFilter::new(month, day)?)
}

/// Write every statistic group for `view`, either as timed text sections or
/// as one JSON document.
pub fn write_statistics<W: Write>(out: &mut W, view: &FilteredView<'_>, json: bool) -> Result<()> {
    if json {
        let summary = TripStatistics::summarize(view);
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    timed_section(
        out,
        "The Most Frequent Times of Travel",
        || TripStatistics::time_stats(view),
        report::render_time_stats,
    )?;
    timed_section(
        out,
        "The Most Popular Stations and Trip",
        || TripStatistics::station_stats(view),
        report::render_station_stats,
    )?;
    timed_section(
        out,
        "Trip Duration",
        || TripStatistics::duration_stats(view),
        report::render_duration_stats,
    )?;
    timed_section(
        out,
        "User Stats",
        || TripStatistics::user_stats(view),
        report::render_user_stats,
    )?;
    Ok(())
}

fn timed_section<W, T>(
    out: &mut W,
    title: &str,
    compute: impl FnOnce() -> T,
    render: impl FnOnce(&T) -> String,
) -> Result<()>
where
    W: Write,
{
    writeln!(out, "\nCalculating {}...\n", title)?;
    let started = Instant::now();
    let stats = compute();
    writeln!(out, "{}", render(&stats))?;
    writeln!(
        out,
        "\nThis took {:.4} seconds.",
        started.elapsed().as_secs_f64()
    )?;
    writeln!(out, "{}", report::RULE)?;
    Ok(())
}

fn with_any(labels: Vec<&'static str>) -> Vec<&'static str> {
    let mut all = vec!["All"];
    all.extend(labels);
    all
}

// ── Tests ─────────────────────────────────────────────────────────────────────
