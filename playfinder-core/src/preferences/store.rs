//! Persisted preference store with change notification.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use tokio::sync::{Mutex as AsyncMutex, RwLock};

use super::error::{PreferenceError, Result};
use super::rating::Rating;
use super::types::{OptionKind, PreferenceSet, PrivacyOption, UseCase};
use crate::config::CoreConfig;
use crate::storage::PreferenceStorage;

/// Callback invoked with the new set after every change.
pub type PreferenceHandler = dyn Fn(&PreferenceSet) + Send + Sync;

/// Handle returned by [`PreferenceStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the current [`PreferenceSet`], persists it and notifies subscribers.
///
/// Share a single store between consumers with an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use playfinder_core::preferences::{OptionKind, PreferenceStore, PrivacyOption};
/// use playfinder_core::storage::MemoryStorage;
///
/// # tokio_test_block_on(async {
/// let store = PreferenceStore::new(Arc::new(MemoryStorage::new()), "prefs");
/// let floor = store.get(OptionKind::AccuracyFloorMeters).await.unwrap();
/// assert_eq!(floor, PrivacyOption::AccuracyFloorMeters(0.0));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct PreferenceStore {
    storage: Arc<dyn PreferenceStorage>,
    storage_key: String,
    current: RwLock<Option<PreferenceSet>>,
    /// Set once `current` holds a set; never cleared.
    initialized: AtomicBool,
    subscribers: Mutex<Vec<(SubscriptionId, Arc<PreferenceHandler>)>>,
    next_subscription: AtomicU64,
    /// Serializes initialization and updates so writes and notifications
    /// are delivered in call order.
    write_lock: AsyncMutex<()>,
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("storage_key", &self.storage_key)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl PreferenceStore {
    /// Creates an uninitialized store persisting under `storage_key`.
    #[must_use]
    pub fn new(storage: Arc<dyn PreferenceStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            storage_key: storage_key.into(),
            current: RwLock::new(None),
            initialized: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            write_lock: AsyncMutex::new(()),
        }
    }

    /// Creates a store using the storage key from `config`.
    #[must_use]
    pub fn with_config(storage: Arc<dyn PreferenceStorage>, config: &CoreConfig) -> Self {
        Self::new(storage, config.storage_key.clone())
    }

    /// Returns whether a set has been loaded or pushed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Loads the persisted set, falling back to defaults.
    ///
    /// Missing, unreadable or malformed data (including an empty list) all
    /// yield [`PreferenceSet::default`]. The resulting set is published to
    /// subscribers. Never fails.
    pub async fn initialize(&self) -> PreferenceSet {
        let _guard = self.write_lock.lock().await;
        self.initialize_locked().await
    }

    async fn initialize_locked(&self) -> PreferenceSet {
        let set = self.load_persisted().await.unwrap_or_default();
        self.publish(set.clone()).await;
        self.notify(&set);
        set
    }

    async fn load_persisted(&self) -> Option<PreferenceSet> {
        let raw = match self.storage.load(&self.storage_key).await {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!("No persisted preferences under {}", self.storage_key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read preferences, using defaults: {e}");
                return None;
            }
        };

        match PreferenceSet::from_json(&raw) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Ignoring malformed persisted preferences: {e}");
                None
            }
        }
    }

    /// Returns the current set, initializing the store first if needed.
    pub async fn snapshot(&self) -> PreferenceSet {
        if let Some(set) = self.current.read().await.clone() {
            return set;
        }

        let _guard = self.write_lock.lock().await;
        if let Some(set) = self.current.read().await.clone() {
            return set;
        }
        self.initialize_locked().await
    }

    /// Returns the current set without initializing.
    ///
    /// Returns `None` before initialization or while an update holds the set.
    #[must_use]
    pub fn current(&self) -> Option<PreferenceSet> {
        self.current
            .try_read()
            .ok()
            .and_then(|current| current.clone())
    }

    /// Returns the current option of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::NotFound`] if the set has no such option.
    pub async fn get(&self, kind: OptionKind) -> Result<PrivacyOption> {
        self.snapshot()
            .await
            .get(kind)
            .copied()
            .ok_or(PreferenceError::NotFound(kind))
    }

    /// Returns whether `use_case` is currently enabled.
    pub async fn is_enabled(&self, use_case: UseCase) -> bool {
        self.snapshot().await.is_enabled(use_case)
    }

    /// Returns the privacy/quality rating of the current set.
    pub async fn rating(&self) -> Rating {
        Rating::of(&self.snapshot().await)
    }

    /// Replaces the current set, persists it and notifies subscribers.
    ///
    /// The write happens before the notification. If the write fails the
    /// current set is left unchanged and no one is notified.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be encoded or persisted.
    pub async fn update(&self, set: PreferenceSet) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let json = set.to_json()?;
        self.storage.save(&self.storage_key, &json).await?;
        debug!("Persisted {} preference options", set.len());

        self.publish(set.clone()).await;
        self.notify(&set);
        Ok(())
    }

    async fn publish(&self, set: PreferenceSet) {
        *self.current.write().await = Some(set);
        self.initialized.store(true, Ordering::Release);
    }

    /// Registers `handler` to be called with every new set.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PreferenceSet) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let handler: Arc<PreferenceHandler> = Arc::new(handler);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Delivers `set` to every subscriber in registration order.
    ///
    /// Handlers run outside the subscriber lock so they may subscribe or
    /// unsubscribe themselves.
    fn notify(&self, set: &PreferenceSet) {
        let handlers: Vec<Arc<PreferenceHandler>> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(set);
        }
    }
}
