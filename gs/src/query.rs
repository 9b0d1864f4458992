//! Linear-scan queries over a loaded collection
//!
//! Every function here borrows the collection and leaves it untouched.
//! Indices are 1-based positions in collection order.

use serde::Serialize;

use crate::error::RangeError;
use crate::point::{Point, euclidean_distance};

/// Meters per kilometer, for radius queries
pub const METERS_PER_KM: f64 = 1000.0;

/// A name match with its 1-based position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub point: Point,
}

/// A name match ranked by distance to a reference point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHit {
    pub index: usize,
    pub point: Point,
    /// Distance in meters
    pub distance: f64,
}

/// A point inside a search radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyHit {
    pub point: Point,
    /// Distance in meters
    pub distance: f64,
}

fn name_matches<'a>(points: &'a [Point], needle: &str) -> impl Iterator<Item = (usize, &'a Point)> {
    let needle = needle.to_lowercase();
    points
        .iter()
        .enumerate()
        .filter(move |(_, point)| point.name().to_lowercase().contains(&needle))
        .map(|(i, point)| (i + 1, point))
}

/// Points whose name contains `needle`, ignoring case, in collection order
pub fn search_by_name(points: &[Point], needle: &str) -> Vec<SearchHit> {
    name_matches(points, needle)
        .map(|(index, point)| SearchHit {
            index,
            point: point.clone(),
        })
        .collect()
}

/// Name matches sorted by ascending distance to `reference`
///
/// Equal distances keep collection order.
pub fn search_closest_by_name(points: &[Point], needle: &str, reference: &Point) -> Vec<RankedHit> {
    let mut hits: Vec<RankedHit> = name_matches(points, needle)
        .map(|(index, point)| RankedHit {
            index,
            point: point.clone(),
            distance: euclidean_distance(reference, point),
        })
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Points no further than `radius_km` kilometers from `reference`, in collection order
///
/// Coordinates are meters, so the radius is scaled by [`METERS_PER_KM`] before comparing.
pub fn search_within_radius(points: &[Point], reference: &Point, radius_km: f64) -> Vec<NearbyHit> {
    let limit = radius_km * METERS_PER_KM;
    points
        .iter()
        .filter_map(|point| {
            let distance = euclidean_distance(reference, point);
            (distance <= limit).then(|| NearbyHit {
                point: point.clone(),
                distance,
            })
        })
        .collect()
}

/// Collection with the inclusive 1-based range `[start, end]` removed
pub fn remove_by_index_range(points: &[Point], start: usize, end: usize) -> Result<Vec<Point>, RangeError> {
    let len = points.len();
    if start < 1 || end > len || start > end {
        return Err(RangeError { start, end, len });
    }

    let mut kept = Vec::with_capacity(len - (end - start + 1));
    kept.extend_from_slice(&points[..start - 1]);
    kept.extend_from_slice(&points[end..]);
    Ok(kept)
}
