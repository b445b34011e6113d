//! Position data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{LocationError, Result};

/// A position fix as reported by the device.
///
/// Raw fixes carry the user's true location and are deliberately not
/// serializable. Only [`ObfuscatedPosition`] may leave the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPosition {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Device-reported accuracy radius in meters (larger = less precise)
    pub accuracy_meters: Option<f64>,

    /// When the fix was captured (UTC)
    pub timestamp: DateTime<Utc>,

    /// Altitude in meters
    pub altitude: Option<f64>,

    /// Altitude accuracy in meters
    pub altitude_accuracy: Option<f64>,

    /// Heading in degrees
    pub heading: Option<f64>,

    /// Speed in meters/second
    pub speed: Option<f64>,
}

impl RawPosition {
    /// Creates a fix without the optional pass-through fields.
    #[must_use]
    pub const fn new(
        latitude: f64,
        longitude: f64,
        accuracy_meters: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            timestamp,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
        }
    }

    /// Returns the reported accuracy, treating absent or invalid values as `0`.
    #[must_use]
    pub fn reported_accuracy(&self) -> f64 {
        match self.accuracy_meters {
            Some(accuracy) if accuracy.is_finite() && accuracy > 0.0 => accuracy,
            _ => 0.0,
        }
    }

    /// Checks that the coordinates describe a real position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidFix`] for non-finite or out-of-range
    /// coordinates.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LocationError::InvalidFix(format!(
                "latitude {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationError::InvalidFix(format!(
                "longitude {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A position that is safe to hand to consumers.
///
/// Either the unchanged raw fix (when it was already at least as imprecise as
/// the configured floor) or a randomly displaced point whose reported accuracy
/// covers the displacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObfuscatedPosition {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Accuracy radius in meters
    pub accuracy_meters: Option<f64>,

    /// When the underlying fix was captured (UTC)
    pub timestamp: DateTime<Utc>,

    /// Altitude in meters
    pub altitude: Option<f64>,

    /// Altitude accuracy in meters
    pub altitude_accuracy: Option<f64>,

    /// Heading in degrees
    pub heading: Option<f64>,

    /// Speed in meters/second
    pub speed: Option<f64>,

    /// Whether the coordinates were displaced from the raw fix
    pub displaced: bool,
}

impl ObfuscatedPosition {
    /// Passes a raw fix through unchanged.
    #[must_use]
    pub fn unchanged(raw: &RawPosition) -> Self {
        Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            accuracy_meters: raw.accuracy_meters,
            timestamp: raw.timestamp,
            altitude: raw.altitude,
            altitude_accuracy: raw.altitude_accuracy,
            heading: raw.heading,
            speed: raw.speed,
            displaced: false,
        }
    }

    /// Replaces the coordinates and accuracy of a raw fix.
    ///
    /// All other fields are copied through.
    #[must_use]
    pub fn displaced(raw: &RawPosition, latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: Some(accuracy),
            displaced: true,
            ..Self::unchanged(raw)
        }
    }

    /// Returns a geohash no finer than the reported accuracy.
    ///
    /// Uses the longest geohash whose cell error radius still covers the
    /// accuracy radius, so the hash never implies more precision than the
    /// position carries.
    #[must_use]
    pub fn geohash(&self) -> String {
        use super::privacy::{geohash_precision_for_radius, location_to_geohash};

        let radius = self.accuracy_meters.unwrap_or(0.0);
        location_to_geohash(
            self.latitude,
            self.longitude,
            geohash_precision_for_radius(radius),
        )
    }

    /// Creates an `ObfuscatedPosition` from JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or missing required fields.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Converts this position to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(latitude: f64, longitude: f64, accuracy: Option<f64>) -> RawPosition {
        RawPosition::new(latitude, longitude, accuracy, Utc::now())
    }

    #[test]
    fn reported_accuracy_defaults_to_zero() {
        assert!(fix(0.0, 0.0, None).reported_accuracy().abs() < f64::EPSILON);
        assert!(fix(0.0, 0.0, Some(-4.0)).reported_accuracy().abs() < f64::EPSILON);
        assert!(fix(0.0, 0.0, Some(f64::NAN)).reported_accuracy().abs() < f64::EPSILON);
        assert!((fix(0.0, 0.0, Some(12.5)).reported_accuracy() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_accepts_boundaries() {
        assert!(fix(90.0, 180.0, None).validate().is_ok());
        assert!(fix(-90.0, -180.0, None).validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_coordinates() {
        for (lat, lon) in [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
            (91.0, 0.0),
            (-91.0, 0.0),
            (0.0, 181.0),
            (0.0, -181.0),
        ] {
            assert!(
                matches!(fix(lat, lon, None).validate(), Err(LocationError::InvalidFix(_))),
                "({lat}, {lon}) should be rejected"
            );
        }
    }

    #[test]
    fn unchanged_copies_every_field() {
        let mut raw = fix(51.96, 7.62, Some(8.0));
        raw.altitude = Some(60.0);
        raw.altitude_accuracy = Some(3.0);
        raw.heading = Some(90.0);
        raw.speed = Some(1.4);

        let position = ObfuscatedPosition::unchanged(&raw);

        assert!(!position.displaced);
        assert_eq!(position.latitude, raw.latitude);
        assert_eq!(position.longitude, raw.longitude);
        assert_eq!(position.accuracy_meters, raw.accuracy_meters);
        assert_eq!(position.timestamp, raw.timestamp);
        assert_eq!(position.altitude, raw.altitude);
        assert_eq!(position.altitude_accuracy, raw.altitude_accuracy);
        assert_eq!(position.heading, raw.heading);
        assert_eq!(position.speed, raw.speed);
    }

    #[test]
    fn displaced_replaces_coordinates_only() {
        let mut raw = fix(51.96, 7.62, Some(5.0));
        raw.speed = Some(2.0);

        let position = ObfuscatedPosition::displaced(&raw, 51.97, 7.63, 105.0);

        assert!(position.displaced);
        assert_eq!(position.latitude, 51.97);
        assert_eq!(position.longitude, 7.63);
        assert_eq!(position.accuracy_meters, Some(105.0));
        assert_eq!(position.speed, Some(2.0));
        assert_eq!(position.timestamp, raw.timestamp);
    }

    #[test]
    fn geohash_gets_coarser_with_accuracy() {
        let raw = fix(51.963_484, 7.627_762, Some(1.0));
        let precise = ObfuscatedPosition::unchanged(&raw);
        let coarse = ObfuscatedPosition::displaced(&raw, raw.latitude, raw.longitude, 500.0);

        let precise_hash = precise.geohash();
        let coarse_hash = coarse.geohash();

        assert!(coarse_hash.len() < precise_hash.len());
        assert!(precise_hash.starts_with(&coarse_hash));
    }

    #[test]
    fn json_roundtrip() {
        let raw = fix(51.96, 7.62, Some(5.0));
        let position = ObfuscatedPosition::displaced(&raw, 51.97, 7.63, 105.0);

        let restored = ObfuscatedPosition::from_json(&position.to_json().unwrap()).unwrap();
        assert_eq!(restored, position);
    }
}
