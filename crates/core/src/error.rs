//! Structured errors with codes, context and recovery suggestions
//!
//! Every failure surfaced by the risk map carries:
//! - A stable error code for programmatic handling
//! - Optional context describing what was being attempted
//! - An optional recovery suggestion
//! - A serializable report form for `--json` output

use riskmap_geo::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    InvalidConfigValue = 3003,

    // Data errors (4xxx)
    DatasetParseError = 4001,
    ShopNotFound = 4002,
    CenterNotFound = 4003,
    InvalidCoordinate = 4004,
    DuplicateId = 4005,

    // Geo errors (5xxx)
    EmptyCandidateSet = 5001,

    // Validation errors (6xxx)
    ValidationError = 6000,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            4 => "Data",
            5 => "Geo",
            6 => "Validation",
            _ => "Other",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ShopNotFound | ErrorCode::CenterNotFound => exit_codes::NOT_FOUND,
            ErrorCode::EmptyCandidateSet => exit_codes::EMPTY_CANDIDATES,
            _ => match self.code() / 1000 {
                3 => exit_codes::CONFIG_ERROR,
                4 | 6 => exit_codes::VALIDATION_ERROR,
                _ => exit_codes::FAILURE,
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .riskmap.toml file or use --config to specify a path")
    }

    pub fn invalid_config_value(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for {}: {}", field, message.into()),
        )
    }

    pub fn shop_not_found(id: i64) -> Self {
        Self::new(ErrorCode::ShopNotFound, format!("Shop not found: {}", id))
            .with_suggestion("Run `riskmap shops` to list known shop IDs")
    }

    pub fn center_not_found(id: i64) -> Self {
        Self::new(ErrorCode::CenterNotFound, format!("Center not found: {}", id))
            .with_suggestion("Run `riskmap centers` to list known center IDs")
    }

    pub fn invalid_coordinate(entity: &str, id: i64, latitude: f64, longitude: f64) -> Self {
        Self::new(
            ErrorCode::InvalidCoordinate,
            format!(
                "{} {} has an invalid coordinate: latitude {}, longitude {}",
                entity, id, latitude, longitude
            ),
        )
        .with_suggestion("Latitude must be within [-90, 90] and longitude within [-180, 180]")
    }

    pub fn duplicate_id(entity: &str, id: i64) -> Self {
        Self::new(ErrorCode::DuplicateId, format!("Duplicate {} id: {}", entity, id))
    }

    pub fn empty_candidate_set() -> Self {
        Self::new(ErrorCode::EmptyCandidateSet, "No centers available to compare against")
            .with_suggestion("Add at least one center to the dataset")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const EMPTY_CANDIDATES: i32 = 5;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::DatasetParseError, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<GeoError> for Error {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::EmptyCandidateSet => Error::empty_candidate_set().with_source(err),
            GeoError::InvalidCoordinate { .. } => {
                Error::new(ErrorCode::InvalidCoordinate, err.to_string()).with_source(err)
            }
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::EmptyCandidateSet.to_string(), "E5001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ShopNotFound.category(), "Data");
        assert_eq!(ErrorCode::EmptyCandidateSet.category(), "Geo");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCode::ShopNotFound.exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(ErrorCode::EmptyCandidateSet.exit_code(), exit_codes::EMPTY_CANDIDATES);
        assert_eq!(ErrorCode::ConfigParseError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::DuplicateId.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_every_code_has_category_and_exit_code() {
        let cases = [
            (ErrorCode::IoError, "IO", exit_codes::FAILURE),
            (ErrorCode::FileNotFound, "IO", exit_codes::FAILURE),
            (ErrorCode::PermissionDenied, "IO", exit_codes::FAILURE),
            (ErrorCode::ConfigError, "Configuration", exit_codes::CONFIG_ERROR),
            (ErrorCode::ConfigNotFound, "Configuration", exit_codes::CONFIG_ERROR),
            (ErrorCode::ConfigParseError, "Configuration", exit_codes::CONFIG_ERROR),
            (ErrorCode::InvalidConfigValue, "Configuration", exit_codes::CONFIG_ERROR),
            (ErrorCode::DatasetParseError, "Data", exit_codes::VALIDATION_ERROR),
            (ErrorCode::ShopNotFound, "Data", exit_codes::NOT_FOUND),
            (ErrorCode::CenterNotFound, "Data", exit_codes::NOT_FOUND),
            (ErrorCode::InvalidCoordinate, "Data", exit_codes::VALIDATION_ERROR),
            (ErrorCode::DuplicateId, "Data", exit_codes::VALIDATION_ERROR),
            (ErrorCode::EmptyCandidateSet, "Geo", exit_codes::EMPTY_CANDIDATES),
            (ErrorCode::ValidationError, "Validation", exit_codes::VALIDATION_ERROR),
        ];

        for (code, category, exit) in cases {
            assert_eq!(code.category(), category, "{code:?}");
            assert_eq!(code.exit_code(), exit, "{code:?}");
        }
    }

    #[test]
    fn test_geo_error_conversion() {
        let err: Error = GeoError::EmptyCandidateSet.into();
        assert_eq!(err.code, ErrorCode::EmptyCandidateSet);
        assert!(err.suggestion.is_some());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::shop_not_found(42).with_context("While resolving nearest center");

        assert_eq!(err.code, ErrorCode::ShopNotFound);
        assert!(err.context.is_some());
        assert!(err.to_string().contains("Shop not found: 42"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::invalid_coordinate("Shop", 3, 91.0, 0.0).with_context("Loading dataset");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E4004"));
        assert!(json.contains("Data"));
        assert!(json.contains("INVALID_COORDINATE"));
    }
}
