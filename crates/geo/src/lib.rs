//! Geodesic distance and nearest-facility resolution for the risk map.
//!
//! This crate provides:
//! - Haversine great-circle distance on a spherical Earth
//! - Nearest-candidate selection with stable tie-breaking
//! - Distance ranking and batch resolution with optional parallelism
//! - Kilometer/meter distance labels
//!
//! # Example
//!
//! ```
//! use riskmap_geo::{distance_km, GeoPoint};
//!
//! let dallas = GeoPoint::new(32.7767, -96.7970);
//! let houston = GeoPoint::new(29.7604, -95.3698);
//!
//! let distance = distance_km(&dallas, &houston);
//! assert!((distance - 362.0).abs() < 5.0);
//! ```

mod error;
mod haversine;
mod nearest;
pub mod batch;
pub mod units;

pub use batch::{nearest_for_each, BatchOutcome};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_km, distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use nearest::{nearest, rank, Located, Nearest, Ranked};
pub use units::{DistanceLabel, DistanceUnit};

/// A geographic point with latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point.
    ///
    /// No range check is performed; see [`GeoPoint::is_valid`].
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are finite and within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns an error describing the point if it is out of range.
    pub fn validate(&self) -> Result<Self> {
        if self.is_valid() {
            Ok(*self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}, {:.*}", p, self.latitude, p, self.longitude),
            None => write!(f, "{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(32.7767, -96.7970);
        assert_eq!(point.latitude, 32.7767);
        assert_eq!(point.longitude, -96.7970);
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_validate_reports_coordinates() {
        let err = GeoPoint::new(95.0, 10.0).validate().unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
        assert!(err.to_string().contains("95"));
    }

    #[test]
    fn test_point_from_tuple() {
        let point: GeoPoint = (29.7604, -95.3698).into();
        assert_eq!(point.latitude, 29.7604);
    }

    #[test]
    fn test_point_display() {
        let point = GeoPoint::new(32.7767, -96.797);
        assert_eq!(point.to_string(), "32.7767, -96.7970");
        assert_eq!(format!("{point:.6}"), "32.776700, -96.797000");
    }
}
