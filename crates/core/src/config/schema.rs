//! Configuration schema definitions
//!
//! Every field has a default so a partial (or absent) file is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(self.map.coverage_radius_m.is_finite() && self.map.coverage_radius_m >= 0.0) {
            return Err(Error::invalid_config_value(
                "map.coverage_radius_m",
                "must be a non-negative number of meters",
            ));
        }

        for (field, value) in [
            ("risk.warning_threshold_pct", self.risk.warning_threshold_pct),
            ("risk.elevated_threshold_pct", self.risk.elevated_threshold_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::invalid_config_value(field, "must be between 0 and 100"));
            }
        }

        if self.risk.elevated_threshold_pct > self.risk.warning_threshold_pct {
            return Err(Error::invalid_config_value(
                "risk.elevated_threshold_pct",
                "must not exceed risk.warning_threshold_pct",
            ));
        }

        Ok(())
    }
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON dataset with centers and shops
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> String {
    "data/sample.json".to_string()
}

/// Map scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Radius of the coverage circle drawn around the focused center
    #[serde(default = "default_coverage_radius_m")]
    pub coverage_radius_m: f64,

    /// Initial zoom level hint for web renderers
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile style hint for web renderers
    #[serde(default = "default_tiles")]
    pub tiles: String,

    /// Characters of analysis text shown in marker popups
    #[serde(default = "default_preview_chars")]
    pub analysis_preview_chars: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            coverage_radius_m: default_coverage_radius_m(),
            zoom: default_zoom(),
            tiles: default_tiles(),
            analysis_preview_chars: default_preview_chars(),
        }
    }
}

fn default_coverage_radius_m() -> f64 {
    2000.0
}

fn default_zoom() -> u8 {
    13
}

fn default_tiles() -> String {
    "CartoDB positron".to_string()
}

fn default_preview_chars() -> usize {
    100
}

/// High-risk share thresholds, in percent of all shops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Above this share the distribution is reported as a warning
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_pct: f64,

    /// Above this share the distribution is reported as elevated
    #[serde(default = "default_elevated_threshold")]
    pub elevated_threshold_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            warning_threshold_pct: default_warning_threshold(),
            elevated_threshold_pct: default_elevated_threshold(),
        }
    }
}

fn default_warning_threshold() -> f64 {
    30.0
}

fn default_elevated_threshold() -> f64 {
    15.0
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Optional file to write logs to
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
