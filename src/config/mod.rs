#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ckan::{default_resource_id, CKAN_BASE};
use crate::core::csv_source::DEFAULT_CSV_LIMIT;
use crate::core::export::OutputFormat;
use crate::core::ConfigProvider;
use crate::domain::model::{SearchQuery, DEFAULT_SEARCH_LIMIT};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Effective settings after the config file and command line are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ckan_endpoint: String,
    pub resource_id: String,
    pub search_limit: usize,
    pub csv_location: Option<String>,
    pub csv_limit: usize,
    pub output_path: String,
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ckan_endpoint: CKAN_BASE.to_string(),
            resource_id: default_resource_id(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            csv_location: None,
            csv_limit: DEFAULT_CSV_LIMIT,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Base query for the configured resource.
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.resource_id.clone()).with_page(self.search_limit, 0)
    }
}

impl ConfigProvider for Settings {
    fn ckan_endpoint(&self) -> &str {
        &self.ckan_endpoint
    }

    fn csv_location(&self) -> Option<&str> {
        self.csv_location.as_deref()
    }

    fn csv_limit(&self) -> usize {
        self.csv_limit
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("ckan.endpoint", &self.ckan_endpoint)?;
        validation::validate_non_empty_string("ckan.resource_id", &self.resource_id)?;
        validation::validate_positive_number("ckan.limit", self.search_limit, 1)?;
        if let Some(location) = &self.csv_location {
            validation::validate_csv_location("csv.location", location)?;
        }
        validation::validate_positive_number("csv.limit", self.csv_limit, 1)?;
        validation::validate_path("output.path", &self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.ckan_endpoint, CKAN_BASE);
        assert_eq!(settings.csv_limit, 5000);
        assert!(settings.csv_location.is_none());
    }

    #[test]
    fn test_invalid_settings() {
        let settings = Settings {
            csv_location: Some(String::new()),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            search_limit: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_query_uses_resource_and_limit() {
        let settings = Settings {
            resource_id: "abc".to_string(),
            search_limit: 25,
            ..Settings::default()
        };
        let query = settings.query();
        assert_eq!(query.resource_id, "abc");
        assert_eq!(query.limit, 25);
        assert_eq!(query.offset, 0);
        assert!(query.q.is_empty());
    }
}
