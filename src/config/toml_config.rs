use crate::config::Settings;
use crate::core::export::OutputFormat;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// On-disk configuration. Every table and key is optional; unset values
/// keep the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub ckan: Option<CkanConfig>,
    pub csv: Option<CsvConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CkanConfig {
    pub endpoint: Option<String>,
    pub resource_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsvConfig {
    pub location: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LocatorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlay the file values on the defaults.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(ckan) = &self.ckan {
            if let Some(endpoint) = &ckan.endpoint {
                settings.ckan_endpoint = endpoint.clone();
            }
            if let Some(resource_id) = &ckan.resource_id {
                settings.resource_id = resource_id.clone();
            }
            if let Some(limit) = ckan.limit {
                settings.search_limit = limit;
            }
        }

        if let Some(csv) = &self.csv {
            if csv.location.is_some() {
                settings.csv_location = csv.location.clone();
            }
            if let Some(limit) = csv.limit {
                settings.csv_limit = limit;
            }
        }

        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                settings.output_path = path.clone();
            }
            if let Some(format) = output.format {
                settings.output_format = format;
            }
        }

        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[ckan]
endpoint = "https://data.example.gov/api/3/action/datastore_search"
resource_id = "abc-123"
limit = 100

[csv]
location = "public/data/playgrounds.csv"
limit = 200

[output]
path = "./maps"
format = "csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let settings = config.to_settings();

        assert_eq!(
            settings.ckan_endpoint,
            "https://data.example.gov/api/3/action/datastore_search"
        );
        assert_eq!(settings.resource_id, "abc-123");
        assert_eq!(settings.search_limit, 100);
        assert_eq!(
            settings.csv_location.as_deref(),
            Some("public/data/playgrounds.csv")
        );
        assert_eq!(settings.csv_limit, 200);
        assert_eq!(settings.output_path, "./maps");
        assert_eq!(settings.output_format, OutputFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let settings = config.to_settings();
        // resource_id follows DVIC_PLAYGROUNDS_RESOURCE_ID, which other tests set
        assert_eq!(
            settings,
            Settings {
                resource_id: settings.resource_id.clone(),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLAYGROUND_TEST_CSV_URL", "https://cdn.example.com/p.csv");

        let toml_content = r#"
[csv]
location = "${PLAYGROUND_TEST_CSV_URL}"

[ckan]
resource_id = "${PLAYGROUND_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let settings = config.to_settings();
        assert_eq!(
            settings.csv_location.as_deref(),
            Some("https://cdn.example.com/p.csv")
        );
        assert_eq!(settings.resource_id, "${PLAYGROUND_TEST_UNSET_VAR}");

        std::env::remove_var("PLAYGROUND_TEST_CSV_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[ckan]
endpoint = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = TomlConfig::from_toml_str("[ckan]\nendpoit = \"x\"\n").unwrap_err();
        assert!(matches!(err, LocatorError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nformat = \"json\"\npath = \"./out\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.to_settings().output_path, "./out");
    }
}
