//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two points in kilometers.
///
/// Inputs are assumed to be valid; out-of-range values produce a defined but
/// meaningless result. Identical points yield exactly `0.0`.
///
/// # Example
/// ```
/// use riskmap_geo::{distance_km, GeoPoint};
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(90.0, 0.0);
///
/// let distance = distance_km(&a, &b);
/// assert!((distance - 10007.5).abs() < 0.1);
/// ```
#[inline]
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two points in meters.
#[inline]
pub fn distance_meters(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn distance_with_radius(from: &GeoPoint, to: &GeoPoint, radius: f64) -> f64 {
    let (lat1, _) = from.to_radians();
    let (lat2, _) = to.to_radians();

    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h just outside [0, 1] near coincident or antipodal points.
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius * c
}
