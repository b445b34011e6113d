//! Shared fixtures for integration tests.
//!
//! Every guard built here uses a [`ManualClock`] and a seeded RNG so that
//! freshness and displacement are reproducible.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use playfinder_core::location::{PositionGuard, RawPosition};
use playfinder_core::preferences::{PreferenceSet, PreferenceStore, PrivacyOption};
use playfinder_core::storage::{MemoryStorage, PreferenceStorage};
use playfinder_core::testing::{ManualClock, ScriptedProvider};
use playfinder_core::{CoreConfig, PlayfinderCore};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Initial map center of the app (Münster).
pub const MUNSTER_LAT: f64 = 51.963_484_569_674_435;
pub const MUNSTER_LON: f64 = 7.627_762_796_489_216;

/// Fixed start time for manual clocks.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

/// A fix at the map center with the given accuracy.
pub fn munster_fix(accuracy: Option<f64>) -> RawPosition {
    RawPosition::new(MUNSTER_LAT, MUNSTER_LON, accuracy, start())
}

/// Builds a preference set with the given floor and interval.
pub fn privacy_set(floor: f64, interval: f64) -> PreferenceSet {
    PreferenceSet::from_options(vec![
        PrivacyOption::AccuracyFloorMeters(floor),
        PrivacyOption::MinRefreshIntervalSeconds(interval),
    ])
    .expect("valid preference set")
}

/// Everything needed to drive a core deterministically.
pub struct Harness {
    pub core: PlayfinderCore,
    pub provider: Arc<ScriptedProvider>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    /// Creates a harness over `storage` with the given provider.
    pub fn new(storage: Arc<dyn PreferenceStorage>, provider: ScriptedProvider) -> Self {
        let config = CoreConfig::default();
        let provider = Arc::new(provider);
        let clock = Arc::new(ManualClock::new(start()));
        let preferences = Arc::new(PreferenceStore::with_config(storage, &config));
        let guard = PositionGuard::new(Arc::clone(&preferences), provider.clone(), &config)
            .with_clock(clock.clone())
            .with_rng(StdRng::seed_from_u64(2024));

        Self {
            core: PlayfinderCore::from_parts(preferences, guard),
            provider,
            clock,
        }
    }

    /// Creates a harness with in-memory storage and preset preferences.
    pub async fn with_privacy(floor: f64, interval: f64, provider: ScriptedProvider) -> Self {
        let harness = Self::new(Arc::new(MemoryStorage::new()), provider);
        harness
            .core
            .update_preferences(privacy_set(floor, interval))
            .await
            .expect("update preferences");
        harness
    }
}
