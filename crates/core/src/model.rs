//! Domain model: distribution centers, supplier shops and risk levels

use riskmap_geo::{GeoPoint, Located};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A distribution center, the candidate destination of nearest-center queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub id: i64,
    pub name: String,
    pub location: GeoPoint,
}

impl Located for Center {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// A supplier shop under risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub location: GeoPoint,
    pub risk: RiskLevel,
    #[serde(default)]
    pub analysis: String,
}

impl Shop {
    /// First `max_chars` characters of the analysis, with `...` when cut
    pub fn analysis_preview(&self, max_chars: usize) -> String {
        match self.analysis.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.analysis[..cut]),
            None => self.analysis.clone(),
        }
    }
}

impl Located for Shop {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Risk category assigned to a shop
///
/// Parsed case-insensitively. Anything unrecognized becomes [`RiskLevel::Unknown`],
/// which is still a regular shop for distance purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    /// The three assessed categories, highest first
    pub const ASSESSED: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    /// Lower-case identifier used in data files
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Upper-case label for display
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }

    /// Marker color category
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "orange",
            RiskLevel::High => "red",
            RiskLevel::Unknown => "gray",
        }
    }

    /// Marker icon name
    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Low => "check-circle",
            RiskLevel::Medium => "exclamation-circle",
            RiskLevel::High => "exclamation-triangle",
            RiskLevel::Unknown => "question",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🔴",
            RiskLevel::Unknown => "⚪",
        }
    }

    /// Parse a stored risk string, never failing
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }
}

impl FromStr for RiskLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}
