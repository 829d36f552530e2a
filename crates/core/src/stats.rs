//! Risk distribution statistics
//!
//! Shops with an unknown risk level count toward `total_shops` (and so toward
//! the denominator of the high-risk share) but never toward a category count.

use crate::config::RiskConfig;
use crate::filter::RiskFilter;
use crate::model::{RiskLevel, Shop};
use serde::Serialize;

/// How alarming the high-risk share is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Elevated,
    Warning,
}

/// Per-category counts over a shop list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RiskCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl RiskCounts {
    pub fn tally<'a>(shops: impl IntoIterator<Item = &'a Shop>) -> Self {
        let mut counts = Self::default();
        for shop in shops {
            match shop.risk {
                RiskLevel::High => counts.high += 1,
                RiskLevel::Medium => counts.medium += 1,
                RiskLevel::Low => counts.low += 1,
                RiskLevel::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
            RiskLevel::Unknown => self.unknown,
        }
    }
}

/// Summary shown next to the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskStats {
    pub total_shops: usize,
    pub visible_shops: usize,
    pub counts: RiskCounts,
    pub high_risk_pct: f64,
    pub alert: AlertLevel,
}

impl RiskStats {
    /// Compute statistics over all shops; `filter` only affects `visible_shops`.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(shops: &[Shop], filter: &RiskFilter, thresholds: &RiskConfig) -> Self {
        let counts = RiskCounts::tally(shops);
        let total_shops = shops.len();
        let visible_shops = shops.iter().filter(|s| filter.allows(s.risk)).count();

        let high_risk_pct = if total_shops > 0 {
            counts.high as f64 * 100.0 / total_shops as f64
        } else {
            0.0
        };

        let alert = if high_risk_pct > thresholds.warning_threshold_pct {
            AlertLevel::Warning
        } else if high_risk_pct > thresholds.elevated_threshold_pct {
            AlertLevel::Elevated
        } else {
            AlertLevel::Normal
        };

        Self {
            total_shops,
            visible_shops,
            counts,
            high_risk_pct,
            alert,
        }
    }
}
