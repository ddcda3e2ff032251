use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdiError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Dataset is empty: {source_name}")]
    EmptyDataset { source_name: String },

    #[error("Nothing to export with the current filters")]
    NothingToExport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OdiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OdiError::ConfigError { .. }
            | OdiError::ConfigValidationError { .. }
            | OdiError::InvalidConfigValueError { .. }
            | OdiError::MissingConfigError { .. } => ErrorCategory::Configuration,
            OdiError::ApiError(_) | OdiError::HttpStatusError { .. } => ErrorCategory::Network,
            OdiError::CsvError(_)
            | OdiError::SerializationError(_)
            | OdiError::ProcessingError { .. }
            | OdiError::EmptyDataset { .. }
            | OdiError::NothingToExport => ErrorCategory::Data,
            OdiError::IoError(_) | OdiError::ZipError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            OdiError::NothingToExport => ErrorSeverity::Low,
            OdiError::ApiError(_) | OdiError::HttpStatusError { .. } => ErrorSeverity::Medium,
            OdiError::CsvError(_)
            | OdiError::SerializationError(_)
            | OdiError::ProcessingError { .. }
            | OdiError::EmptyDataset { .. }
            | OdiError::ConfigError { .. }
            | OdiError::ConfigValidationError { .. }
            | OdiError::InvalidConfigValueError { .. }
            | OdiError::MissingConfigError { .. } => ErrorSeverity::High,
            OdiError::IoError(_) | OdiError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OdiError::ApiError(_) | OdiError::HttpStatusError { .. } => {
                "Check the source URL and network access, or pass --fallback-to-demo"
            }
            OdiError::IoError(_) => "Check that the input file exists and the output path is writable",
            OdiError::ZipError(_) => "Retry without --zip or free some disk space",
            OdiError::CsvError(_) | OdiError::ProcessingError { .. } => {
                "Check the survey file encoding (UTF-8 expected) and retry"
            }
            OdiError::SerializationError(_) => {
                "Make sure the JSON source is an array of flat records or an object with a \"rows\" array"
            }
            OdiError::EmptyDataset { .. } => "Provide a file with at least one response",
            OdiError::NothingToExport => "Relax the volume/channel filters or clear the search text",
            OdiError::ConfigError { .. }
            | OdiError::ConfigValidationError { .. }
            | OdiError::InvalidConfigValueError { .. }
            | OdiError::MissingConfigError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            OdiError::ApiError(_) | OdiError::HttpStatusError { .. } => {
                format!("Could not fetch the survey data: {}", self)
            }
            OdiError::IoError(e) => format!("Could not read or write a file: {}", e),
            OdiError::SerializationError(e) => format!("Could not read the JSON data: {}", e),
            OdiError::EmptyDataset { source_name } => {
                format!("No survey responses found in {}", source_name)
            }
            OdiError::NothingToExport => "Nothing to export with the current filters.".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OdiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_export_is_low_severity() {
        let err = OdiError::NothingToExport;
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_config_errors_share_category() {
        let err = OdiError::MissingConfigError {
            field: "source.input".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("source.input"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: OdiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("gone"));
    }
}
