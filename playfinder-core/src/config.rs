//! Core configuration.

use serde::{Deserialize, Serialize};

/// Storage key under which preferences are persisted.
pub const DEFAULT_STORAGE_KEY: &str = "location_options_storage";

/// Number of vertices used to approximate the accuracy disc.
pub const DEFAULT_BUFFER_STEPS: usize = 64;

/// Settings for wiring the preference store and the position guard.
///
/// Missing JSON fields take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Key used with the preference storage backend.
    pub storage_key: String,

    /// Vertices of the buffered accuracy disc (minimum 3).
    pub buffer_steps: usize,

    /// Whether concurrent position requests share one device fetch.
    pub dedupe_concurrent_fetches: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            buffer_steps: DEFAULT_BUFFER_STEPS,
            dedupe_concurrent_fetches: true,
        }
    }
}

impl CoreConfig {
    /// Creates a `CoreConfig` from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Converts this config to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CoreConfig::default();
        assert_eq!(config.storage_key, "location_options_storage");
        assert_eq!(config.buffer_steps, 64);
        assert!(config.dedupe_concurrent_fetches);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = CoreConfig::from_json(r#"{"buffer_steps": 16}"#).unwrap();
        assert_eq!(config.buffer_steps, 16);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.dedupe_concurrent_fetches);
    }

    #[test]
    fn json_roundtrip() {
        let config = CoreConfig {
            storage_key: "custom".to_string(),
            buffer_steps: 32,
            dedupe_concurrent_fetches: false,
        };
        let restored = CoreConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn from_json_rejects_invalid() {
        assert!(CoreConfig::from_json("not json").is_err());
    }
}
