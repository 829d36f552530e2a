//! Nearest-candidate selection.
//!
//! Candidates are scanned linearly. Ties are resolved in favour of the
//! candidate that appears first in iteration order, with no epsilon: two
//! distances tie only when they are bit-for-bit equal.

use crate::{distance_km, GeoError, GeoPoint, Result};
use serde::Serialize;

/// Anything that sits at a fixed geographic point.
pub trait Located {
    /// The point used for distance calculations.
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    #[inline]
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

/// The closest candidate to an origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nearest<'a, T> {
    /// Winning candidate
    pub candidate: &'a T,
    /// Position of the candidate in the input slice
    pub index: usize,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

/// A candidate together with its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked<'a, T> {
    /// Ranked candidate
    pub candidate: &'a T,
    /// Position of the candidate in the input slice
    pub index: usize,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

/// Finds the candidate closest to `origin`.
///
/// # Errors
///
/// Returns [`GeoError::EmptyCandidateSet`] when `candidates` is empty.
///
/// # Example
/// ```
/// use riskmap_geo::{nearest, GeoPoint};
///
/// let centers = [GeoPoint::new(0.0, 0.0001), GeoPoint::new(0.0, 0.0)];
/// let shop = GeoPoint::new(0.0, 0.0);
///
/// let found = nearest(&shop, &centers).unwrap();
/// assert_eq!(found.index, 1);
/// assert_eq!(found.distance_km, 0.0);
/// ```
pub fn nearest<'a, T: Located>(origin: &GeoPoint, candidates: &'a [T]) -> Result<Nearest<'a, T>> {
    let mut iter = candidates.iter().enumerate();
    let (_, first) = iter.next().ok_or(GeoError::EmptyCandidateSet)?;

    let mut best = Nearest {
        candidate: first,
        index: 0,
        distance_km: distance_km(origin, &first.location()),
    };

    for (index, candidate) in iter {
        let distance = distance_km(origin, &candidate.location());
        // Strict comparison keeps the earliest of equidistant candidates.
        if distance < best.distance_km {
            best = Nearest { candidate, index, distance_km: distance };
        }
    }

    Ok(best)
}

/// Ranks every candidate by distance from `origin`, closest first.
///
/// The sort is stable, so equidistant candidates keep their input order.
/// `limit` truncates the result when set.
pub fn rank<'a, T: Located>(
    origin: &GeoPoint,
    candidates: &'a [T],
    limit: Option<usize>,
) -> Vec<Ranked<'a, T>> {
    let mut ranked: Vec<Ranked<'a, T>> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Ranked {
            candidate,
            index,
            distance_km: distance_km(origin, &candidate.location()),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if let Some(max) = limit {
        ranked.truncate(max);
    }

    ranked
}
