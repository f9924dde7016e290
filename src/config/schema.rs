//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watcher.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the watcher daemon.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WatcherConfig {
    /// Directory holding the proxy's site configuration files.
    pub directory: PathBuf,

    /// Seconds to wait between checks.
    pub interval_secs: u64,

    /// Deadline for a single hostname lookup in seconds.
    pub resolve_timeout_secs: u64,

    /// Detect changes but never run the reload command.
    pub dry_run: bool,

    /// Reload command settings.
    pub reload: ReloadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl WatcherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/etc/nginx/sites-enabled"),
            interval_secs: 3600,
            resolve_timeout_secs: 10,
            dry_run: false,
            reload: ReloadConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// External reload command, invoked as `<command> <argument>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReloadConfig {
    /// Path to the init script (or any executable).
    pub command: PathBuf,

    /// Single argument passed to the command.
    pub argument: String,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("/etc/init.d/nginx"),
            argument: "restart".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit per-file and per-hostname diagnostics (forces debug level).
    pub verbose: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config: WatcherConfig = toml::from_str("").unwrap();
        assert_eq!(config, WatcherConfig::default());
        assert_eq!(config.interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_partial_document() {
        let config: WatcherConfig = toml::from_str(
            r#"
            directory = "/srv/nginx/conf.d"
            interval_secs = 60

            [reload]
            command = "/usr/sbin/service-reload"
            "#,
        )
        .unwrap();
        assert_eq!(config.directory, PathBuf::from("/srv/nginx/conf.d"));
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.reload.command, PathBuf::from("/usr/sbin/service-reload"));
        assert_eq!(config.reload.argument, "restart");
        assert!(!config.dry_run);
    }
}
