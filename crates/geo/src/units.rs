//! Distance labels in kilometers and meters.
//!
//! Distances of one kilometer or more are shown in kilometers with two
//! decimals and the meter value in parentheses. Shorter distances lead with
//! whole meters and show kilometers to three decimals.

use serde::Serialize;
use std::fmt;

/// Distances at or above this value lead with kilometers.
pub const KILOMETER_THRESHOLD: f64 = 1.0;

/// Unit shown first in a [`DistanceLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers
    Kilometers,
    /// Meters
    Meters,
}

/// Human-readable distance with a primary and a secondary unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceLabel {
    /// Leading unit
    pub unit: DistanceUnit,
    /// Leading value, e.g. `"12.34 km"`
    pub primary: String,
    /// Parenthetical value, e.g. `"12340 m"`
    pub secondary: String,
}

impl DistanceLabel {
    /// Builds the label for a distance given in kilometers.
    ///
    /// # Example
    /// ```
    /// use riskmap_geo::DistanceLabel;
    ///
    /// assert_eq!(DistanceLabel::from_km(12.3456).to_string(), "12.35 km (12346 m)");
    /// assert_eq!(DistanceLabel::from_km(0.5).to_string(), "500 m (0.500 km)");
    /// ```
    pub fn from_km(distance_km: f64) -> Self {
        let meters = whole_meters(distance_km);

        if distance_km >= KILOMETER_THRESHOLD {
            Self {
                unit: DistanceUnit::Kilometers,
                primary: format!("{distance_km:.2} km"),
                secondary: format!("{meters} m"),
            }
        } else {
            Self {
                unit: DistanceUnit::Meters,
                primary: format!("{meters} m"),
                secondary: format!("{distance_km:.3} km"),
            }
        }
    }
}

impl fmt::Display for DistanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.primary, self.secondary)
    }
}

/// Rounds to the nearest meter, halves away from zero.
#[allow(clippy::cast_possible_truncation)]
fn whole_meters(distance_km: f64) -> i64 {
    (distance_km * 1000.0).round() as i64
}
