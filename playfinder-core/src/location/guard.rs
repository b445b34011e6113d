//! Cached, privacy-preserving access to the device position.
//!
//! [`PositionGuard`] sits between location consumers and the device. Every
//! request goes through the same steps:
//!
//! ```text
//! current_position()
//!     ├── read interval + floor from PreferenceStore (once per call)
//!     ├── cache fresh?  ── yes ──► cached ObfuscatedPosition
//!     ├── LocationProvider::current_position()  ── error ──► None
//!     ├── obfuscate_position(raw, floor)
//!     └── cache + return
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex as AsyncMutex;

use super::privacy::obfuscate_position;
use super::provider::{Clock, LocationProvider, SystemClock};
use super::types::{ObfuscatedPosition, RawPosition};
use crate::config::CoreConfig;
use crate::preferences::PreferenceStore;

/// The most recent position handed out, with the time it was cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The cached position
    pub position: ObfuscatedPosition,
    /// When the entry was stored (clock time, not fix time)
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Returns whether this entry is younger than `interval_seconds` at `now`.
    ///
    /// An entry from the future (clock moved backwards) is never fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, interval_seconds: f64) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = (now - self.cached_at).num_milliseconds() as f64 / 1000.0;
        elapsed >= 0.0 && elapsed < interval_seconds
    }
}

/// Preference values a single request works with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Policy {
    floor_meters: f64,
    interval_seconds: f64,
}

/// Mediates between location consumers and the device position.
///
/// Enforces the accuracy floor on every emitted position and the minimum
/// refresh interval on device polling. Failures never escape: a request
/// that cannot be answered yields `None`.
pub struct PositionGuard {
    preferences: Arc<PreferenceStore>,
    provider: Arc<dyn LocationProvider>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    cache: Mutex<Option<CacheEntry>>,
    /// Held across the device fetch when de-duplication is on.
    fetch_lock: AsyncMutex<()>,
    buffer_steps: usize,
    dedupe_concurrent_fetches: bool,
}

impl fmt::Debug for PositionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionGuard")
            .field("preferences", &self.preferences)
            .field("buffer_steps", &self.buffer_steps)
            .field("dedupe_concurrent_fetches", &self.dedupe_concurrent_fetches)
            .finish_non_exhaustive()
    }
}

impl PositionGuard {
    /// Creates a guard using the system clock and an entropy-seeded RNG.
    #[must_use]
    pub fn new(
        preferences: Arc<PreferenceStore>,
        provider: Arc<dyn LocationProvider>,
        config: &CoreConfig,
    ) -> Self {
        Self {
            preferences,
            provider,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
            cache: Mutex::new(None),
            fetch_lock: AsyncMutex::new(()),
            buffer_steps: config.buffer_steps,
            dedupe_concurrent_fetches: config.dedupe_concurrent_fetches,
        }
    }

    /// Replaces the clock used for cache freshness.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the random number generator (seed it for reproducible output).
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Returns the current position with the accuracy floor applied.
    ///
    /// Serves the cached position while it is younger than the refresh
    /// interval. Otherwise fetches a fresh fix, obfuscates it and caches the
    /// result. Returns `None` if the device cannot provide a valid fix; the
    /// cache is left untouched in that case and no retry is made.
    ///
    /// Preferences are read once at the start of the call, so a concurrent
    /// preference change applies from the next call on.
    pub async fn current_position(&self) -> Option<ObfuscatedPosition> {
        let policy = self.read_policy().await;

        if let Some(position) = self.fresh_cached(policy.interval_seconds) {
            debug!("Serving cached position");
            return Some(position);
        }

        let _fetch_guard = if self.dedupe_concurrent_fetches {
            let guard = self.fetch_lock.lock().await;
            // Another caller may have refreshed the cache while we waited.
            if let Some(position) = self.fresh_cached(policy.interval_seconds) {
                debug!("Serving position fetched by concurrent request");
                return Some(position);
            }
            Some(guard)
        } else {
            None
        };

        let raw = match self.provider.current_position().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("No position available: {e}");
                return None;
            }
        };
        if let Err(e) = raw.validate() {
            warn!("Discarding device fix: {e}");
            return None;
        }

        let position = self.obfuscate_with_floor(&raw, policy.floor_meters);
        self.store(position.clone());
        debug!("Cached fresh position (displaced: {})", position.displaced);
        Some(position)
    }

    /// Applies the current accuracy floor to `raw` without touching the cache.
    ///
    /// Use this for positions obtained outside [`current_position`], such as
    /// continuous watch updates.
    ///
    /// [`current_position`]: Self::current_position
    pub async fn obfuscate(&self, raw: &RawPosition) -> ObfuscatedPosition {
        let policy = self.read_policy().await;
        self.obfuscate_with_floor(raw, policy.floor_meters)
    }

    /// Returns the cached entry, fresh or not.
    #[must_use]
    pub fn cached(&self) -> Option<CacheEntry> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the cached entry so the next request fetches a fresh fix.
    pub fn clear_cache(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Reads both values from one snapshot so an update cannot split them.
    ///
    /// The snapshot falls back to defaults (no floor, always refresh) when
    /// the persisted preferences cannot be read.
    async fn read_policy(&self) -> Policy {
        let set = self.preferences.snapshot().await;
        Policy {
            floor_meters: set.accuracy_floor_meters(),
            interval_seconds: set.min_refresh_interval_seconds(),
        }
    }

    fn fresh_cached(&self, interval_seconds: f64) -> Option<ObfuscatedPosition> {
        let now = self.clock.now();
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|entry| entry.is_fresh(now, interval_seconds))
            .map(|entry| entry.position.clone())
    }

    fn obfuscate_with_floor(&self, raw: &RawPosition, floor_meters: f64) -> ObfuscatedPosition {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        obfuscate_position(raw, floor_meters, self.buffer_steps, &mut *rng)
    }

    fn store(&self, position: ObfuscatedPosition) {
        let entry = CacheEntry {
            position,
            cached_at: self.clock.now(),
        };
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }
}
