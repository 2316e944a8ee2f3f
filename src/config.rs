// Updater configuration
//
// Serde-backed so the host can persist it wherever its platform keeps
// settings (NVS blob, file, …); this crate never stores it.

use serde::{Deserialize, Serialize};

use crate::board::UNKNOWN_VARIANT;
use crate::schedule::DEFAULT_CHECK_INTERVAL_MS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Repository in "owner/name" form.
    pub repo: String,
    /// Board variant identifier used for asset selection.
    pub board_variant: String,
    /// Minimum milliseconds between release checks.
    pub check_interval_ms: u32,
    /// Apply a found update immediately instead of waiting for a host command.
    pub auto_update: bool,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            board_variant: UNKNOWN_VARIANT.to_string(),
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            auto_update: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization_round_trip() {
        let config = UpdaterConfig {
            repo: "acme/sensor-firmware".to_string(),
            board_variant: "ESP32_S3".to_string(),
            check_interval_ms: 30 * 60 * 1000,
            auto_update: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UpdaterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_defaults() {
        let config = UpdaterConfig::default();
        assert_eq!(config.board_variant, UNKNOWN_VARIANT);
        assert_eq!(config.check_interval_ms, DEFAULT_CHECK_INTERVAL_MS);
        assert!(!config.auto_update);
    }
}
