//! Error types for device location requests.

use thiserror::Error;

/// Reason a device position could not be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The user denied location permission.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Positioning is unavailable (no signal, service disabled, ...).
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    /// The device did not answer in time.
    #[error("Location request timed out")]
    Timeout,

    /// The device returned coordinates that are not a valid position.
    #[error("Invalid position fix: {0}")]
    InvalidFix(String),
}

/// Result type alias for location requests.
pub type Result<T> = std::result::Result<T, LocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
    }

    #[test]
    fn unavailable_display() {
        let err = LocationError::Unavailable("gps off".to_string());
        assert_eq!(err.to_string(), "Location unavailable: gps off");
    }

    #[test]
    fn timeout_display() {
        assert_eq!(LocationError::Timeout.to_string(), "Location request timed out");
    }

    #[test]
    fn invalid_fix_display() {
        let err = LocationError::InvalidFix("latitude 91".to_string());
        assert_eq!(err.to_string(), "Invalid position fix: latitude 91");
    }
}
