//! Nearest intersection to a GPS fix.
//!
//! Distance is planar Euclidean distance over raw `(longitude, latitude)`
//! degrees, not geodesic distance. The tolerance is in the same degree
//! units, so switching to haversine would change which intersections
//! qualify.

use beavernet_streets_models::Intersection;
use geo::{Distance, Euclidean, Point};

use crate::store::StreetData;

/// Default search tolerance in degrees.
pub const DEFAULT_MAX_DISTANCE: f64 = 0.01;

/// Returns `true` if the coordinates are finite and `max_distance` is a
/// finite positive number.
#[must_use]
pub fn is_valid_query(latitude: f64, longitude: f64, max_distance: f64) -> bool {
    latitude.is_finite() && longitude.is_finite() && max_distance.is_finite() && max_distance > 0.0
}

/// Returns the intersection closest to `(latitude, longitude)` whose
/// distance is strictly less than `max_distance`.
///
/// Intersections without coordinates are skipped. On exact ties the first
/// intersection in load order wins.
#[must_use]
pub fn find_closest_intersection(
    data: &StreetData,
    latitude: f64,
    longitude: f64,
    max_distance: f64,
) -> Option<Intersection> {
    if !is_valid_query(latitude, longitude, max_distance) {
        return None;
    }

    let query = Point::new(longitude, latitude);
    let mut best_distance = max_distance;
    let mut best: Option<&Intersection> = None;

    for intersection in data.intersections() {
        let Some(coords) = intersection.coordinates.filter(|c| c.is_finite()) else {
            continue;
        };

        let distance = Euclidean.distance(query, Point::new(coords.longitude, coords.latitude));
        if distance < best_distance {
            best_distance = distance;
            best = Some(intersection);
        }
    }

    if let Some(found) = best {
        log::debug!(
            "Closest intersection to ({latitude}, {longitude}) is {:?} at {best_distance:.6}",
            found.name
        );
    }

    best.cloned()
}
