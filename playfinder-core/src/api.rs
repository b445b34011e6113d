//! Entry point wiring preferences and position access together.

use std::sync::Arc;

use log::debug;

use crate::config::CoreConfig;
use crate::location::{LocationProvider, ObfuscatedPosition, PositionGuard};
use crate::preferences::{PreferenceSet, PreferenceStore, Result, UseCase};
use crate::storage::PreferenceStorage;

/// Core interface for Playfinder functionality.
///
/// Owns one [`PreferenceStore`] and one [`PositionGuard`] reading from it.
/// Consumers that need only one half can take the store handle from
/// [`preferences`](Self::preferences).
#[derive(Debug)]
pub struct PlayfinderCore {
    preferences: Arc<PreferenceStore>,
    guard: PositionGuard,
}

impl PlayfinderCore {
    /// Creates a new `PlayfinderCore` instance.
    ///
    /// Preferences are loaded lazily on first use or by
    /// [`initialize`](Self::initialize).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use async_trait::async_trait;
    /// use playfinder_core::location::{LocationError, LocationProvider, RawPosition};
    /// use playfinder_core::storage::MemoryStorage;
    /// use playfinder_core::{CoreConfig, PlayfinderCore};
    ///
    /// struct NoGps;
    ///
    /// #[async_trait]
    /// impl LocationProvider for NoGps {
    ///     async fn current_position(&self) -> Result<RawPosition, LocationError> {
    ///         Err(LocationError::PermissionDenied)
    ///     }
    /// }
    ///
    /// let core = PlayfinderCore::new(
    ///     Arc::new(MemoryStorage::new()),
    ///     Arc::new(NoGps),
    ///     CoreConfig::default(),
    /// );
    /// assert!(!core.is_initialized());
    /// ```
    #[must_use]
    pub fn new(
        storage: Arc<dyn PreferenceStorage>,
        provider: Arc<dyn LocationProvider>,
        config: CoreConfig,
    ) -> Self {
        let preferences = Arc::new(PreferenceStore::with_config(storage, &config));
        let guard = PositionGuard::new(Arc::clone(&preferences), provider, &config);
        Self { preferences, guard }
    }

    /// Creates a core around an already configured guard and its store.
    #[must_use]
    pub const fn from_parts(preferences: Arc<PreferenceStore>, guard: PositionGuard) -> Self {
        Self { preferences, guard }
    }

    /// Returns whether preferences have been loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.preferences.is_initialized()
    }

    /// Loads persisted preferences (or defaults). Never fails.
    pub async fn initialize(&self) -> PreferenceSet {
        self.preferences.initialize().await
    }

    /// Returns the shared preference store.
    #[must_use]
    pub const fn preferences(&self) -> &Arc<PreferenceStore> {
        &self.preferences
    }

    /// Returns the position guard.
    #[must_use]
    pub const fn guard(&self) -> &PositionGuard {
        &self.guard
    }

    /// Returns the obfuscated current position, or `None` if unavailable.
    pub async fn current_position(&self) -> Option<ObfuscatedPosition> {
        self.guard.current_position().await
    }

    /// Returns the obfuscated current position for `use_case`.
    ///
    /// Returns `None` without touching the device if the user disabled the
    /// use case.
    pub async fn position_for(&self, use_case: UseCase) -> Option<ObfuscatedPosition> {
        if !self.preferences.is_enabled(use_case).await {
            debug!("Location use disabled for {use_case:?}");
            return None;
        }
        self.guard.current_position().await
    }

    /// Replaces the preference set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    pub async fn update_preferences(&self, set: PreferenceSet) -> Result<()> {
        self.preferences.update(set).await
    }
}
