//! Risk level filter applied to the shops shown on the map
//!
//! The filter only decides visibility. It never narrows the centers used for
//! nearest-center resolution.

use crate::model::{RiskLevel, Shop};
use serde::{Deserialize, Serialize};

/// Which assessed risk categories are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFilter {
    pub include_high: bool,
    pub include_medium: bool,
    pub include_low: bool,
}

impl Default for RiskFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl RiskFilter {
    /// Show every category
    pub const fn all() -> Self {
        Self {
            include_high: true,
            include_medium: true,
            include_low: true,
        }
    }

    /// Build from "hide" switches as exposed on the command line
    pub const fn hiding(high: bool, medium: bool, low: bool) -> Self {
        Self {
            include_high: !high,
            include_medium: !medium,
            include_low: !low,
        }
    }

    /// Shops with an unknown risk level are always shown.
    pub fn allows(&self, level: RiskLevel) -> bool {
        match level {
            RiskLevel::High => self.include_high,
            RiskLevel::Medium => self.include_medium,
            RiskLevel::Low => self.include_low,
            RiskLevel::Unknown => true,
        }
    }

    /// Visible shops, in input order
    pub fn apply<'a>(&self, shops: &'a [Shop]) -> Vec<&'a Shop> {
        shops.iter().filter(|shop| self.allows(shop.risk)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskmap_geo::GeoPoint;

    fn shop(id: i64, risk: RiskLevel) -> Shop {
        Shop {
            id,
            name: format!("Shop {id}"),
            location: GeoPoint::new(0.0, 0.0),
            risk,
            analysis: String::new(),
        }
    }

    #[test]
    fn test_default_shows_everything() {
        let filter = RiskFilter::default();
        for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low, RiskLevel::Unknown] {
            assert!(filter.allows(level));
        }
    }

    #[test]
    fn test_unknown_always_visible() {
        let filter = RiskFilter::hiding(true, true, true);
        assert!(!filter.allows(RiskLevel::High));
        assert!(!filter.allows(RiskLevel::Medium));
        assert!(!filter.allows(RiskLevel::Low));
        assert!(filter.allows(RiskLevel::Unknown));
    }

    #[test]
    fn test_apply_keeps_order() {
        let shops = vec![
            shop(1, RiskLevel::High),
            shop(2, RiskLevel::Low),
            shop(3, RiskLevel::Medium),
            shop(4, RiskLevel::Unknown),
            shop(5, RiskLevel::Low),
        ];
        let filter = RiskFilter::hiding(false, true, false);
        let ids: Vec<i64> = filter.apply(&shops).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }
}
