//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::WatcherConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "upstream-watcher")]
#[command(
    about = "A daemon which parses nginx configs, and checks to see whether the IPs of any backend nodes have changed",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to grab configs from
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Seconds to wait between checks
    #[arg(short, long, value_name = "SECONDS")]
    pub time: Option<u64>,

    /// Location of init script (defaults to /etc/init.d/nginx)
    #[arg(short, long, value_name = "PATH")]
    pub init_script: Option<PathBuf>,

    /// Seconds to wait for a single hostname lookup
    #[arg(long, value_name = "SECONDS")]
    pub resolve_timeout: Option<u64>,

    /// Only report changes, never restart nginx
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the effective configuration: defaults, then file, then flags.
    pub fn into_config(self) -> Result<WatcherConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => WatcherConfig::default(),
        };

        if let Some(directory) = self.directory {
            config.directory = directory;
        }
        if let Some(time) = self.time {
            config.interval_secs = time;
        }
        if let Some(init_script) = self.init_script {
            config.reload.command = init_script;
        }
        if let Some(timeout) = self.resolve_timeout {
            config.resolve_timeout_secs = timeout;
        }
        config.dry_run |= self.dry_run;
        config.observability.verbose |= self.verbose;

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = Cli::try_parse_from(["upstream-watcher"]).unwrap();
        assert_eq!(cli.into_config().unwrap(), WatcherConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "upstream-watcher",
            "-d",
            "/tmp/sites",
            "-t",
            "120",
            "-i",
            "/usr/local/bin/reload-proxy",
            "-n",
            "-v",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.directory, PathBuf::from("/tmp/sites"));
        assert_eq!(config.interval_secs, 120);
        assert_eq!(config.reload.command, PathBuf::from("/usr/local/bin/reload-proxy"));
        assert!(config.dry_run);
        assert!(config.observability.verbose);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.toml");
        fs::write(&path, "interval_secs = 30\nresolve_timeout_secs = 2\ndirectory = \"/a\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "upstream-watcher",
            "--config",
            path.to_str().unwrap(),
            "--directory",
            "/b",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.directory, PathBuf::from("/b"));
        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.resolve_timeout_secs, 2);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["upstream-watcher", "-t", "soon"]).is_err());

        let cli = Cli::try_parse_from(["upstream-watcher", "-t", "0"]).unwrap();
        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }
}
