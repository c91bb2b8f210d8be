use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::registry::CityRegistry;
use crate::selectors::SelectorVocabulary;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bikeshare trip data",
    version
)]
pub struct Settings {
    /// City to analyse (asked interactively if omitted)
    #[arg(long)]
    pub city: Option<String>,

    /// Month filter: a month name or "all" (asked interactively if omitted)
    #[arg(long)]
    pub month: Option<String>,

    /// Weekday filter: a day name or "all" (asked interactively if omitted)
    #[arg(long)]
    pub day: Option<String>,

    /// Directory holding the bundled city CSV files
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// JSON city registry replacing the bundled one
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Number of months offered for filtering, starting at January (1-12)
    #[arg(long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month_count: u32,

    /// Raw rows shown per page (1-100)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// Output format for statistics
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Never prompt; unspecified filters default to "all"
    #[arg(long)]
    pub no_interactive: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] over an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The registry file if one was given, otherwise the bundled cities
    /// under `data_dir`.
    pub fn city_registry(&self) -> Result<CityRegistry> {
        match &self.registry {
            Some(path) => CityRegistry::load_from(path),
            None => Ok(CityRegistry::bundled(&self.data_dir)),
        }
    }

    pub fn vocabulary(&self) -> Result<SelectorVocabulary> {
        SelectorVocabulary::first_months(self.month_count)
    }

    pub fn page_size(&self) -> usize {
        self.page_size as usize
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
