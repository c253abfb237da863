use crate::config::{Settings, TomlConfig};
use crate::core::export::OutputFormat;
use crate::domain::model::SearchQuery;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "playground-locator")]
#[command(about = "Find playgrounds in open-data portals and CSV exports")]
#[command(version)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// CKAN datastore_search endpoint
    #[arg(long, global = true)]
    pub ckan_endpoint: Option<String>,

    /// CSV export (URL or file path) used by `csv` and as the `fetch` fallback
    #[arg(long, global = true)]
    pub csv_location: Option<String>,

    #[arg(long, global = true)]
    pub output_path: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Query the CKAN datastore
    Search(SearchArgs),

    /// Load playgrounds from the CSV export
    Csv {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Query CKAN, falling back to the CSV export when it fails
    Fetch(SearchArgs),

    /// Resolve an app path against the route table
    Route { path: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Full text query, e.g. a suburb name
    #[arg(short, long, default_value = "")]
    pub q: String,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// CKAN filters as a JSON object, e.g. '{"suburb":"Carlton"}'
    #[arg(long)]
    pub filters: Option<String>,

    #[arg(long)]
    pub resource_id: Option<String>,
}

impl SearchArgs {
    pub fn to_query(&self, settings: &Settings) -> Result<SearchQuery> {
        let mut query = settings
            .query()
            .with_text(self.q.clone())
            .with_page(self.limit.unwrap_or(settings.search_limit), self.offset);

        if let Some(resource_id) = &self.resource_id {
            query.resource_id = resource_id.clone();
        }

        if let Some(raw) = &self.filters {
            let filters: serde_json::Value =
                serde_json::from_str(raw).map_err(|e| LocatorError::InvalidConfigValueError {
                    field: "filters".to_string(),
                    value: raw.clone(),
                    reason: format!("Invalid JSON: {}", e),
                })?;
            validation::validate_filters("filters", &filters)?;
            query = query.with_filters(filters);
        }

        Ok(query)
    }
}

impl CliConfig {
    /// Config file (if any) overlaid with command line flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?.to_settings()
            }
            None => Settings::default(),
        };

        if let Some(endpoint) = &self.ckan_endpoint {
            settings.ckan_endpoint = endpoint.clone();
        }
        if let Some(location) = &self.csv_location {
            settings.csv_location = Some(location.clone());
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }

        Ok(settings)
    }
}
