//! Combined privacy and quality ratings for a preference set.
//!
//! The settings page summarizes all options as two four-step levels. Privacy
//! rises with a coarser accuracy floor, a longer refresh interval and fewer
//! enabled use cases. Quality rises with a finer floor and fresher fixes.
//!
//! | Score       | Level        |
//! |-------------|--------------|
//! | `[0, 0.25)` | `Low`        |
//! | `[0.25, 0.5)` | `MediumLow`  |
//! | `[0.5, 0.75)` | `MediumHigh` |
//! | `[0.75, 1]` | `High`       |

use super::types::{OptionKind, PreferenceSet, UseCase};

const ACCURACY_WEIGHT: f64 = 0.5;
const INTERVAL_WEIGHT: f64 = 0.2;
const USE_CASE_WEIGHT: f64 = 0.3;

/// A four-step rating level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Lowest rating.
    Low,
    /// Below average.
    MediumLow,
    /// Above average.
    MediumHigh,
    /// Highest rating.
    High,
}

impl Level {
    /// Maps a score in `[0, 1]` to a level. Out-of-range scores are clamped.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if score >= 0.75 {
            Self::High
        } else if score >= 0.5 {
            Self::MediumHigh
        } else if score >= 0.25 {
            Self::MediumLow
        } else {
            Self::Low
        }
    }
}

/// Privacy and quality summary of a preference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    /// Privacy score in `[0, 1]`.
    pub privacy_score: f64,
    /// Quality score in `[0, 1]`.
    pub quality_score: f64,
}

impl Rating {
    /// Computes the rating for `set`.
    #[must_use]
    pub fn of(set: &PreferenceSet) -> Self {
        let accuracy = normalized(set.accuracy_floor_meters(), OptionKind::AccuracyFloorMeters);
        let interval = normalized(
            set.min_refresh_interval_seconds(),
            OptionKind::MinRefreshIntervalSeconds,
        );

        #[allow(clippy::cast_precision_loss)]
        let disabled = UseCase::ALL
            .iter()
            .filter(|use_case| !set.is_enabled(**use_case))
            .count() as f64
            / UseCase::ALL.len() as f64;

        Self {
            privacy_score: USE_CASE_WEIGHT.mul_add(
                disabled,
                ACCURACY_WEIGHT.mul_add(accuracy, INTERVAL_WEIGHT * interval),
            ),
            quality_score: 0.6f64.mul_add(1.0 - accuracy, 0.4 * (1.0 - interval)),
        }
    }

    /// Returns the privacy level.
    #[must_use]
    pub fn privacy(&self) -> Level {
        Level::from_score(self.privacy_score)
    }

    /// Returns the quality level.
    #[must_use]
    pub fn quality(&self) -> Level {
        Level::from_score(self.quality_score)
    }
}

fn normalized(value: f64, kind: OptionKind) -> f64 {
    match kind.range() {
        Some((min, max)) if max > min => ((value - min) / (max - min)).clamp(0.0, 1.0),
        _ => 0.0,
    }
}
