pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{Settings, TomlConfig};

pub use adapters::storage::LocalStorage;
pub use crate::core::ckan::{search_ckan, CkanClient};
pub use crate::core::csv_source::{load_csv, parse_csv, CsvSource};
pub use crate::core::locator::{LocatedPlaygrounds, PlaygroundLocator};
pub use crate::core::normalize::{extract_coords, record_subtitle, record_title};
pub use domain::model::{Coordinates, Field, Playground, Record, SearchQuery, SearchResult};
pub use utils::error::{LocatorError, Result};
