//! Collaborators supplying device positions and the current time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::Result;
use super::types::RawPosition;

/// Source of one-shot device position fixes (GPS, network positioning).
///
/// Implemented by the platform layer. Any timeout is the provider's own;
/// the core never cancels a request once it is issued.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Requests the current device position.
    ///
    /// # Errors
    ///
    /// Returns an error if permission is denied, positioning is unavailable
    /// or the request times out.
    async fn current_position(&self) -> Result<RawPosition>;
}

/// Source of the current time, used for cache freshness.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }
}
