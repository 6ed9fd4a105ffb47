//! `[serve]` section configuration.
//!
//! Contains preview server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 6942                 # HTTP port number
//! open = true                 # Open the page in a browser on startup
//! watch = true                # Reload the browser when the file changes
//! poll_interval_ms = 1000     # How often the page asks for a new version
//! stylesheet = "https://..."  # Stylesheet linked from the page, "" for none
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the preview reachable from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Stylesheet used when the config does not name one.
pub const DEFAULT_STYLESHEET: &str = "https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.8.1/github-markdown-light.min.css";

/// Lower bound for `poll_interval_ms`.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Preview server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number. Busy ports fall through to the next ones.
    pub port: u16,

    /// Open the served page in the default browser.
    pub open: bool,

    /// Watch the file and inject the reload script.
    pub watch: bool,

    /// Interval of the page's version polling, in milliseconds.
    pub poll_interval_ms: u64,

    /// Stylesheet URL linked from the page shell.
    pub stylesheet: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 6942,
            open: true,
            watch: true,
            poll_interval_ms: 1000,
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error(FieldPath::new("serve.port"), "port must not be 0");
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            diag.error_with_hint(
                FieldPath::new("serve.poll_interval_ms"),
                format!("{} ms is too short", self.poll_interval_ms),
                format!("use at least {MIN_POLL_INTERVAL_MS}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nwatch = false\nopen = false",
        );

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert!(!config.serve.watch);
        assert!(!config.serve.open);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 6942);
        assert!(config.serve.watch);
        assert!(config.serve.open);
        assert_eq!(config.serve.poll_interval_ms, 1000);
        assert!(config.serve.stylesheet.contains("github-markdown-css/5.8.1"));
    }

    #[test]
    fn test_serve_config_ipv6_interface() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }

    #[test]
    fn test_serve_config_partial_override() {
        let config = test_parse_config("[serve]\nport = 3000");

        assert_eq!(config.serve.port, 3000);
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert!(config.serve.watch);
    }

    #[test]
    fn test_serve_validate() {
        let mut diag = ConfigDiagnostics::new();
        ServeConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());

        let config = ServeConfig {
            port: 0,
            poll_interval_ms: 10,
            ..ServeConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
