//! City → trip-log file mapping.
//!
//! The registry is configuration handed to the loader. The built-in one
//! knows the three published cities; a JSON file can replace it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ExplorerError, Result};
use crate::models::CityCapabilities;

/// Where a city's trip log lives and which optional columns it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySource {
    pub path: PathBuf,
    #[serde(default = "default_capabilities")]
    pub capabilities: CityCapabilities,
}

fn default_capabilities() -> CityCapabilities {
    CityCapabilities::FULL
}

/// Mapping from lower-case city name to its source.
///
/// JSON form:
///
/// ```json
/// {
///   "cities": {
///     "chicago": { "path": "chicago.csv" },
///     "washington": {
///       "path": "washington.csv",
///       "capabilities": { "gender": false, "birth_year": false }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRegistry {
    cities: BTreeMap<String, CitySource>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three published cities, with files resolved against `data_dir`.
    pub fn bundled(data_dir: &Path) -> Self {
        let mut registry = Self::new();
        registry.insert(
            "chicago",
            data_dir.join("chicago.csv"),
            CityCapabilities::FULL,
        );
        registry.insert(
            "new york city",
            data_dir.join("new_york_city.csv"),
            CityCapabilities::FULL,
        );
        registry.insert(
            "washington",
            data_dir.join("washington.csv"),
            CityCapabilities::BASIC,
        );
        registry
    }

    /// Register (or replace) a city. The name is stored lower-cased.
    pub fn insert(
        &mut self,
        city: &str,
        path: impl Into<PathBuf>,
        capabilities: CityCapabilities,
    ) {
        self.cities.insert(
            normalize_city(city),
            CitySource {
                path: path.into(),
                capabilities,
            },
        );
    }

    /// Look up a city, ignoring case and surrounding whitespace.
    pub fn resolve(&self, city: &str) -> Result<&CitySource> {
        self.lookup(city).map(|(_, source)| source)
    }

    /// Like [`CityRegistry::resolve`], also returning the registered name.
    pub fn lookup(&self, city: &str) -> Result<(&str, &CitySource)> {
        self.cities
            .get_key_value(&normalize_city(city))
            .map(|(name, source)| (name.as_str(), source))
            .ok_or_else(|| ExplorerError::UnknownCity(city.trim().to_string()))
    }

    /// Registered city names in alphabetical order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Read a registry from a JSON file.
    ///
    /// Relative paths inside the file are resolved against the file's own
    /// directory. An empty registry is rejected.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ExplorerError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: CityRegistry = serde_json::from_str(&content)?;
        if parsed.is_empty() {
            return Err(ExplorerError::Config(format!(
                "registry {} has no cities",
                path.display()
            )));
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut registry = Self::new();
        for (city, source) in parsed.cities {
            let resolved = if source.path.is_absolute() {
                source.path
            } else {
                base.join(source.path)
            };
            registry.insert(&city, resolved, source.capabilities);
        }
        tracing::debug!(
            "Loaded city registry from {} ({} cities)",
            path.display(),
            registry.len()
        );
        Ok(registry)
    }
}

fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}
