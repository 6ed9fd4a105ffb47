//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! debounce_ms = 100   # quiet time before a burst of writes is rendered
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Upper bound for `debounce_ms`.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// File watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            diag.error_with_hint(
                FieldPath::new("watch.debounce_ms"),
                format!("{} ms is too long", self.debounce_ms),
                format!("use at most {MAX_DEBOUNCE_MS}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_config() {
        let config = test_parse_config("[watch]\ndebounce_ms = 250");
        assert_eq!(config.watch.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_watch_config_zero_debounce_allowed() {
        let config = test_parse_config("[watch]\ndebounce_ms = 0");
        let mut diag = ConfigDiagnostics::new();
        config.watch.validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_watch_validate_upper_bound() {
        let config = WatchConfig { debounce_ms: 60_000 };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
