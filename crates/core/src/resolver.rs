//! Nearest-center resolution for shops
//!
//! Wraps the generic resolver in `riskmap-geo` with the shop/center domain.
//! Every call recomputes from its inputs; nothing is cached between calls.

use crate::error::Result;
use crate::filter::RiskFilter;
use crate::model::{Center, Shop};
use crate::repository::Repository;
use riskmap_geo::{DistanceLabel, Located};
use serde::Serialize;

/// A shop paired with its closest center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestResult {
    pub shop: Shop,
    pub center: Center,
    pub distance_km: f64,
}

impl NearestResult {
    /// Distance formatted with the kilometer/meter threshold rule
    pub fn label(&self) -> DistanceLabel {
        DistanceLabel::from_km(self.distance_km)
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_km * 1000.0
    }
}

/// A center with its distance from a shop, as produced by [`rank_centers`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCenter {
    pub center: Center,
    pub distance_km: f64,
}

/// Find the center closest to `shop`.
///
/// All centers are always considered. Equidistant centers resolve to the one
/// listed first.
///
/// # Errors
///
/// `EmptyCandidateSet` when `centers` is empty.
pub fn resolve(shop: &Shop, centers: &[Center]) -> Result<NearestResult> {
    let found = riskmap_geo::nearest(&shop.location(), centers)?;

    tracing::debug!(
        shop_id = shop.id,
        center_id = found.candidate.id,
        distance_km = found.distance_km,
        "Resolved nearest center"
    );

    Ok(NearestResult {
        shop: shop.clone(),
        center: found.candidate.clone(),
        distance_km: found.distance_km,
    })
}

/// Look up a shop and resolve its nearest center.
///
/// An unknown shop id yields `Ok(None)` with no computation performed.
///
/// # Errors
///
/// Repository failures, and `EmptyCandidateSet` when there are no centers.
pub fn resolve_by_id<R: Repository + ?Sized>(
    repository: &R,
    shop_id: i64,
) -> Result<Option<NearestResult>> {
    let Some(shop) = repository.get_shop(shop_id)? else {
        tracing::info!(shop_id, "Shop not found, skipping nearest-center resolution");
        return Ok(None);
    };

    let centers = repository.list_centers()?;
    resolve(&shop, &centers).map(Some)
}

/// Resolve every shop admitted by `filter`, in repository order.
///
/// # Errors
///
/// `EmptyCandidateSet` when there are no centers and at least one shop passes
/// the filter.
pub fn resolve_all<R: Repository + ?Sized>(
    repository: &R,
    filter: &RiskFilter,
) -> Result<Vec<NearestResult>> {
    let shops = repository.list_shops()?;
    let centers = repository.list_centers()?;
    let visible = filter.apply(&shops);

    let outcomes = riskmap_geo::nearest_for_each(&visible, &centers)?;

    tracing::debug!(shops = visible.len(), centers = centers.len(), "Batch resolution finished");

    Ok(outcomes
        .into_iter()
        .map(|outcome| NearestResult {
            shop: visible[outcome.origin_index].clone(),
            center: centers[outcome.candidate_index].clone(),
            distance_km: outcome.distance_km,
        })
        .collect())
}

/// Every center ordered by distance from `shop`, optionally truncated.
pub fn rank_centers(shop: &Shop, centers: &[Center], limit: Option<usize>) -> Vec<RankedCenter> {
    riskmap_geo::rank(&shop.location(), centers, limit)
        .into_iter()
        .map(|ranked| RankedCenter {
            center: ranked.candidate.clone(),
            distance_km: ranked.distance_km,
        })
        .collect()
}

/// A shop with its distance from a center, as produced by [`shops_within_radius`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveredShop {
    pub shop: Shop,
    pub distance_km: f64,
}

/// Shops no farther than `radius_m` meters from `center`, closest first.
pub fn shops_within_radius(center: &Center, shops: &[Shop], radius_m: f64) -> Vec<CoveredShop> {
    let radius_km = radius_m / 1000.0;
    riskmap_geo::rank(&center.location(), shops, None)
        .into_iter()
        .take_while(|ranked| ranked.distance_km <= radius_km)
        .map(|ranked| CoveredShop {
            shop: ranked.candidate.clone(),
            distance_km: ranked.distance_km,
        })
        .collect()
}
