//! Test doubles for the location collaborators.
//!
//! Only compiled for tests or with the `test-utils` feature. DO NOT use in
//! production.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::location::{Clock, LocationError, LocationProvider, RawPosition};

/// [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `seconds` (negative moves it back).
    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`LocationProvider`] answering from a script.
///
/// Queued responses are returned first, in order. Once the queue is empty
/// every request receives the fallback fix.
#[derive(Debug)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<RawPosition, LocationError>>>,
    fallback: Result<RawPosition, LocationError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Creates a provider that always answers with `fix`.
    #[must_use]
    pub fn always(fix: RawPosition) -> Self {
        Self::with_fallback(Ok(fix))
    }

    /// Creates a provider that always fails with `error`.
    #[must_use]
    pub fn failing(error: LocationError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<RawPosition, LocationError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues a response ahead of the fallback.
    #[must_use]
    pub fn then(self, response: Result<RawPosition, LocationError>) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
        self
    }

    /// Makes every request wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns how many requests have been made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedProvider {
    async fn current_position(&self) -> Result<RawPosition, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let queued = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}
