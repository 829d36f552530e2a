//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Nearest-candidate resolution was asked to choose from nothing
    #[error("Empty candidate set: at least one candidate location is required")]
    EmptyCandidateSet,

    /// Coordinate outside the valid latitude/longitude range
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },
}

/// Error code for integration with riskmap-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// No candidates supplied
    EmptyCandidateSet = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::EmptyCandidateSet => GeoErrorCode::EmptyCandidateSet,
            GeoError::InvalidCoordinate { .. } => GeoErrorCode::InvalidCoordinate,
        }
    }
}
