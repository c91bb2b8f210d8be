//! Shared building blocks for the bikeshare explorer: trip models, selectors,
//! the city registry, frequency counting, settings and errors.

pub mod error;
pub mod formatting;
pub mod frequency;
pub mod models;
pub mod registry;
pub mod selectors;
pub mod settings;

pub use error::{ExplorerError, Result};
