//! Location module for Playfinder.
//!
//! Provides privacy-preserving access to the device position:
//! - Accuracy-floor obfuscation (random geodesic displacement)
//! - A single-entry cache honoring the minimum refresh interval
//! - Geohash encoding no finer than the reported accuracy
//!
//! # Privacy Guarantees
//!
//! - Raw fixes are not serializable; only [`ObfuscatedPosition`] leaves the core
//! - A displaced position lies `0.2 × floor` to `1.2 × floor` meters from the
//!   true fix and never reports better accuracy than the floor
//! - A fix already at least as imprecise as the floor is passed through as is
//!
//! # Example Usage
//!
//! ```
//! use chrono::Utc;
//! use playfinder_core::location::{obfuscate_position, RawPosition};
//!
//! let raw = RawPosition::new(51.963_484, 7.627_762, Some(5.0), Utc::now());
//!
//! // Floor of 100 m: the fix is displaced and reports 105 m accuracy
//! let position = obfuscate_position(&raw, 100.0, 64, &mut rand::thread_rng());
//! assert!(position.displaced);
//! assert_eq!(position.accuracy_meters, Some(105.0));
//!
//! // No floor: the fix is returned unchanged
//! let position = obfuscate_position(&raw, 0.0, 64, &mut rand::thread_rng());
//! assert!(!position.displaced);
//! assert_eq!(position.latitude, raw.latitude);
//! ```

mod error;
pub mod geodesy;
mod guard;
pub mod privacy;
mod provider;
pub mod types;

pub use error::{LocationError, Result};
pub use guard::{CacheEntry, PositionGuard};
pub use privacy::{location_to_geohash, needs_displacement, obfuscate_position};
pub use provider::{Clock, LocationProvider, SystemClock};
pub use types::{ObfuscatedPosition, RawPosition};
