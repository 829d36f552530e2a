//! Batch nearest-candidate resolution with optional parallelism.
//!
//! Each origin is resolved independently against the same candidate slice,
//! so the work spreads across threads with no coordination. Output order
//! always matches input order.

use crate::{nearest, Located, Result};
use serde::Serialize;

/// Resolution outcome for one origin in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Position of the origin in the input slice
    pub origin_index: usize,
    /// Position of the nearest candidate in the candidate slice
    pub candidate_index: usize,
    /// Distance in kilometers
    pub distance_km: f64,
}

/// Resolves the nearest candidate for every origin.
///
/// # Errors
///
/// Returns [`crate::GeoError::EmptyCandidateSet`] when `candidates` is empty,
/// unless `origins` is also empty.
///
/// # Example
/// ```
/// use riskmap_geo::{nearest_for_each, GeoPoint};
///
/// let centers = [GeoPoint::new(32.7767, -96.7970), GeoPoint::new(29.7604, -95.3698)];
/// let shops = [GeoPoint::new(29.7700, -95.3800), GeoPoint::new(32.7850, -96.8000)];
///
/// let results = nearest_for_each(&shops, &centers).unwrap();
/// assert_eq!(results[0].candidate_index, 1);
/// assert_eq!(results[1].candidate_index, 0);
/// ```
pub fn nearest_for_each<O, C>(origins: &[O], candidates: &[C]) -> Result<Vec<BatchOutcome>>
where
    O: Located + Sync,
    C: Located + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        origins
            .par_iter()
            .enumerate()
            .map(|(origin_index, origin)| resolve_single(origin_index, origin, candidates))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        origins
            .iter()
            .enumerate()
            .map(|(origin_index, origin)| resolve_single(origin_index, origin, candidates))
            .collect()
    }
}

#[inline]
fn resolve_single<O: Located, C: Located>(
    origin_index: usize,
    origin: &O,
    candidates: &[C],
) -> Result<BatchOutcome> {
    let found = nearest(&origin.location(), candidates)?;

    Ok(BatchOutcome {
        origin_index,
        candidate_index: found.index,
        distance_km: found.distance_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoError, GeoPoint};

    fn centers() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(32.7767, -96.7970),  // Dallas
            GeoPoint::new(29.7604, -95.3698),  // Houston
            GeoPoint::new(33.4484, -112.0740), // Phoenix
        ]
    }

    #[test]
    fn test_batch_matches_single_resolution() {
        let shops: Vec<GeoPoint> = (0..200)
            .map(|i| GeoPoint::new(29.0 + f64::from(i % 50) * 0.1, -112.0 + f64::from(i) * 0.08))
            .collect();
        let centers = centers();

        let results = nearest_for_each(&shops, &centers).unwrap();
        assert_eq!(results.len(), shops.len());

        for (i, outcome) in results.iter().enumerate() {
            assert_eq!(outcome.origin_index, i);
            let single = nearest(&shops[i], &centers).unwrap();
            assert_eq!(outcome.candidate_index, single.index);
            assert_eq!(outcome.distance_km.to_bits(), single.distance_km.to_bits());
        }
    }

    #[test]
    fn test_batch_without_candidates_fails() {
        let shops = [GeoPoint::new(0.0, 0.0)];
        let none: [GeoPoint; 0] = [];
        assert_eq!(nearest_for_each(&shops, &none).unwrap_err(), GeoError::EmptyCandidateSet);
    }

    #[test]
    fn test_empty_batch_is_empty() {
        let shops: [GeoPoint; 0] = [];
        let none: [GeoPoint; 0] = [];
        assert!(nearest_for_each(&shops, &none).unwrap().is_empty());
    }
}
