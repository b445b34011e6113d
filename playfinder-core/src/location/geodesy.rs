//! Spherical-earth geodesy helpers.
//!
//! Coordinates use [`Coord`] with `x` = longitude and `y` = latitude, in
//! degrees. Distances are meters on the mean-radius sphere of
//! [`geo::Haversine`]. Intermediate longitudes are not wrapped so that
//! shapes crossing the antimeridian keep a contiguous bounding box; call
//! [`normalize`] on any point that leaves this module.

use geo::{BoundingRect, Coord, Destination, Distance, Haversine, LineString, Point, Rect};
use rand::Rng;

/// Mean earth radius in meters, as used by [`geo::Haversine`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

const MAX_DISTANCE_METERS: f64 = std::f64::consts::PI * EARTH_RADIUS_METERS;

/// Returns the point reached by travelling `distance` meters from `origin`
/// along the great circle with initial `bearing` (degrees clockwise from
/// north).
#[must_use]
pub fn destination(origin: Coord, distance: f64, bearing: f64) -> Coord {
    Haversine::destination(Point::from(origin), bearing, distance).into()
}

/// Great-circle distance in meters.
#[must_use]
pub fn distance(a: Coord, b: Coord) -> f64 {
    // Rounding near antipodes can leave the domain of asin; `min` drops the NaN.
    Haversine::distance(Point::from(a), Point::from(b)).min(MAX_DISTANCE_METERS)
}

/// Approximates a disc of `radius` meters around `center` with `steps`
/// vertices (at least 3). The ring is not closed.
#[must_use]
pub fn buffer(center: Coord, radius: f64, steps: usize) -> Vec<Coord> {
    let steps = steps.max(3);
    #[allow(clippy::cast_precision_loss)]
    let step_angle = 360.0 / steps as f64;
    (0..steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let bearing = -(i as f64) * step_angle;
            destination(center, radius, bearing)
        })
        .collect()
}

/// Moves every vertex `distance` meters along `bearing`.
#[must_use]
pub fn translate(ring: &[Coord], distance: f64, bearing: f64) -> Vec<Coord> {
    ring.iter()
        .map(|vertex| destination(*vertex, distance, bearing))
        .collect()
}

/// Returns the axis-aligned bounding box of `ring`, or `None` if it is empty.
#[must_use]
pub fn bounding_box(ring: &[Coord]) -> Option<Rect> {
    LineString::new(ring.to_vec()).bounding_rect()
}

/// Samples a point uniformly in longitude/latitude inside `bbox`.
pub fn random_point_in<R: Rng + ?Sized>(bbox: &Rect, rng: &mut R) -> Coord {
    let min = bbox.min();
    let max = bbox.max();
    Coord {
        x: rng.gen::<f64>().mul_add(max.x - min.x, min.x),
        y: rng.gen::<f64>().mul_add(max.y - min.y, min.y),
    }
}

/// Clamps latitude to `[-90, 90]` and wraps longitude into `[-180, 180]`.
#[must_use]
pub fn normalize(c: Coord) -> Coord {
    let mut lon = (c.x + 180.0).rem_euclid(360.0) - 180.0;
    if lon == -180.0 && c.x > 0.0 {
        lon = 180.0;
    }
    Coord {
        x: lon,
        y: c.y.clamp(-90.0, 90.0),
    }
}
