//! Trip-log engine for the bikeshare explorer.
//!
//! Loads a city's CSV trip log, narrows it with month/weekday filters, pages
//! through the raw rows and computes the travel-time, station, duration and
//! user statistics.

pub mod filter;
pub mod pagination;
pub mod reader;
pub mod statistics;

pub use bikeshare_core as core;
