//! Accuracy-floor obfuscation and geohash encoding.
//!
//! This module provides functions for:
//! - Degrading a position fix to a configured accuracy floor
//! - Geohash encoding at a precision matching an accuracy radius
//!
//! # Obfuscation
//!
//! A fix whose reported accuracy is already at least the floor is returned
//! unchanged. Otherwise the fix is buffered into a disc of `floor` meters,
//! the disc is moved by `[0.2, 1.2) × floor` meters in a random direction and
//! a point is drawn uniformly from the moved disc's bounding box. Samples
//! farther than the displacement window from the true fix are redrawn, so the
//! emitted point always lies between `0.2 × floor` and `1.2 × floor` from the
//! truth. The reported accuracy becomes `floor + raw accuracy`.

use geo::Coord;
use rand::Rng;

use super::geodesy;
use super::types::{ObfuscatedPosition, RawPosition};

/// Minimum displacement as a fraction of the floor.
pub const MIN_OFFSET_FACTOR: f64 = 0.2;

/// Maximum (exclusive) displacement as a fraction of the floor.
pub const MAX_OFFSET_FACTOR: f64 = 1.2;

const MAX_SAMPLE_ATTEMPTS: usize = 32;

/// Largest usable floor: half the earth's circumference. No point on the
/// sphere lies farther from the fix.
pub const MAX_FLOOR_METERS: f64 = std::f64::consts::PI * geodesy::EARTH_RADIUS_METERS;

/// Returns whether a fix with `accuracy` must be displaced to honor `floor`.
///
/// Larger accuracy values mean less precision, so a fix that already reports
/// an accuracy of at least `floor` meters needs no displacement. A floor of
/// `0` (or any non-positive or non-finite floor) disables displacement.
///
/// # Examples
///
/// ```
/// use playfinder_core::location::needs_displacement;
///
/// assert!(needs_displacement(5.0, 100.0));
/// assert!(!needs_displacement(150.0, 100.0));
/// assert!(!needs_displacement(5.0, 0.0));
/// ```
#[must_use]
pub fn needs_displacement(accuracy: f64, floor: f64) -> bool {
    floor.is_finite() && floor > 0.0 && accuracy < floor
}

/// Degrades `raw` to the accuracy `floor` (meters).
///
/// `buffer_steps` is the number of vertices approximating the accuracy disc.
/// Floors beyond [`MAX_FLOOR_METERS`] are treated as that maximum.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use playfinder_core::location::{obfuscate_position, RawPosition};
/// use rand::SeedableRng;
///
/// let raw = RawPosition::new(51.9635, 7.6278, Some(5.0), Utc::now());
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
///
/// let position = obfuscate_position(&raw, 100.0, 64, &mut rng);
/// assert!(position.displaced);
/// assert_eq!(position.accuracy_meters, Some(105.0));
/// ```
pub fn obfuscate_position<R: Rng + ?Sized>(
    raw: &RawPosition,
    floor: f64,
    buffer_steps: usize,
    rng: &mut R,
) -> ObfuscatedPosition {
    let accuracy = raw.reported_accuracy();
    if !needs_displacement(accuracy, floor) {
        return ObfuscatedPosition::unchanged(raw);
    }
    let floor = floor.min(MAX_FLOOR_METERS);

    let origin = Coord {
        x: raw.longitude,
        y: raw.latitude,
    };
    let min_offset = MIN_OFFSET_FACTOR * floor;
    let max_offset = MAX_OFFSET_FACTOR * floor;
    let offset = rng.gen_range(min_offset..max_offset);
    let bearing = rng.gen_range(0.0..360.0);

    let disc = geodesy::buffer(origin, floor, buffer_steps);
    let moved = geodesy::translate(&disc, offset, bearing);

    let point = geodesy::bounding_box(&moved)
        .and_then(|bbox| {
            (0..MAX_SAMPLE_ATTEMPTS).find_map(|_| {
                let candidate = geodesy::normalize(geodesy::random_point_in(&bbox, &mut *rng));
                let distance = geodesy::distance(origin, candidate);
                (distance >= min_offset && distance < max_offset).then_some(candidate)
            })
        })
        .unwrap_or_else(|| geodesy::normalize(geodesy::destination(origin, offset, bearing)));

    ObfuscatedPosition::displaced(raw, point.y, point.x, floor + accuracy)
}

/// Converts latitude/longitude to a geohash string.
///
/// Each additional character narrows the cell roughly 5x; see
/// [`geohash_error_radius`] for the cell size per length.
///
/// # Examples
///
/// ```
/// use playfinder_core::location::location_to_geohash;
///
/// let geohash = location_to_geohash(51.9635, 7.6278, 8);
/// assert_eq!(geohash.len(), 8);
/// ```
///
/// # Error Handling
///
/// Returns an empty string if encoding fails (out-of-range coordinates).
/// Callers should pass validated positions.
#[must_use]
pub fn location_to_geohash(lat: f64, lon: f64, precision: u8) -> String {
    geohash::encode(geohash::Coord { x: lon, y: lat }, precision as usize)
        .unwrap_or_else(|_| String::new())
}

/// Calculates the approximate error radius for a given geohash precision.
///
/// Returns the maximum distance (in meters) from the geohash center to any
/// point within the geohash cell.
///
/// # Examples
///
/// ```
/// use playfinder_core::location::privacy::geohash_error_radius;
///
/// assert_eq!(geohash_error_radius(8), 19.0);
/// ```
#[must_use]
pub const fn geohash_error_radius(precision: u8) -> f64 {
    match precision {
        1 => 2_500_000.0,
        2 => 630_000.0,
        3 => 78_000.0,
        4 => 20_000.0,
        5 => 2_400.0,
        6 => 610.0,
        7 => 76.0,
        8 => 19.0,
        9 => 2.4,
        10 => 0.6,
        _ => 0.0,
    }
}

/// Returns the longest geohash length (1-10) whose error radius is at least
/// `radius` meters.
///
/// # Examples
///
/// ```
/// use playfinder_core::location::privacy::geohash_precision_for_radius;
///
/// assert_eq!(geohash_precision_for_radius(0.0), 10);
/// assert_eq!(geohash_precision_for_radius(100.0), 6);
/// assert_eq!(geohash_precision_for_radius(5_000_000.0), 1);
/// ```
#[must_use]
pub fn geohash_precision_for_radius(radius: f64) -> u8 {
    (1..=10u8)
        .rev()
        .find(|&precision| geohash_error_radius(precision) >= radius)
        .unwrap_or(1)
}
