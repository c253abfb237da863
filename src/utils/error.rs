use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CKAN request failed: {status}")]
    CkanStatusError { status: u16 },

    #[error("CKAN response not successful")]
    CkanUnsuccessful,

    #[error("CSV fetch failed: {status}")]
    CsvFetchError { status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LocatorError::ApiError(_)
            | LocatorError::CkanStatusError { .. }
            | LocatorError::CsvFetchError { .. } => ErrorCategory::Network,
            LocatorError::CkanUnsuccessful
            | LocatorError::CsvError(_)
            | LocatorError::SerializationError(_) => ErrorCategory::Data,
            LocatorError::IoError(_) => ErrorCategory::Io,
            LocatorError::ConfigError { .. }
            | LocatorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Severity drives the CLI exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LocatorError::ApiError(_)
            | LocatorError::CkanStatusError { .. }
            | LocatorError::CsvFetchError { .. } => ErrorSeverity::Medium,
            LocatorError::CkanUnsuccessful
            | LocatorError::CsvError(_)
            | LocatorError::SerializationError(_) => ErrorSeverity::High,
            LocatorError::IoError(_) => ErrorSeverity::Critical,
            LocatorError::ConfigError { .. }
            | LocatorError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LocatorError::ApiError(_) => {
                "Check your network connection and that the endpoint is reachable".to_string()
            }
            LocatorError::CkanStatusError { status } if *status >= 500 => {
                "The open-data portal is having trouble; retry later or use the CSV fallback"
                    .to_string()
            }
            LocatorError::CkanStatusError { .. } => {
                "Check the resource id and filters sent to the CKAN endpoint".to_string()
            }
            LocatorError::CkanUnsuccessful => {
                "The CKAN action rejected the query; verify the resource id".to_string()
            }
            LocatorError::CsvFetchError { .. } => {
                "Make sure the CSV location exists and is publicly readable".to_string()
            }
            LocatorError::CsvError(_) => "Check the CSV file encoding and layout".to_string(),
            LocatorError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            LocatorError::SerializationError(_) => {
                "The response was not valid JSON; inspect the endpoint output".to_string()
            }
            LocatorError::ConfigError { .. } => "Review the configuration file".to_string(),
            LocatorError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download playground data: {}", self),
            ErrorCategory::Data => format!("Playground data could not be read: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
