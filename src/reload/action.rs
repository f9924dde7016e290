//! The external reload action.

use std::path::PathBuf;
use std::process::ExitStatus;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Errors from invoking the reload action.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// The command could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and reported failure.
    #[error("{command} exited with {status}")]
    Failed { command: PathBuf, status: ExitStatus },
}

/// Something that makes the proxy pick up new backend addresses.
#[async_trait]
pub trait ReloadAction: Send + Sync {
    async fn reload(&self) -> Result<(), ReloadError>;
}

/// Runs `<command> <argument>`, e.g. `/etc/init.d/nginx restart`.
#[derive(Debug, Clone)]
pub struct CommandReload {
    command: PathBuf,
    argument: String,
}

impl CommandReload {
    pub fn new(command: impl Into<PathBuf>, argument: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            argument: argument.into(),
        }
    }
}

#[async_trait]
impl ReloadAction for CommandReload {
    async fn reload(&self) -> Result<(), ReloadError> {
        tracing::info!(command = %self.command.display(), argument = %self.argument, "Invoking reload command");

        let status = Command::new(&self.command)
            .arg(&self.argument)
            .status()
            .await
            .map_err(|source| ReloadError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if status.success() {
            tracing::debug!(command = %self.command.display(), "Reload command returned with 0 exit code");
            Ok(())
        } else {
            Err(ReloadError::Failed {
                command: self.command.clone(),
                status,
            })
        }
    }
}

/// Reports what would have been reloaded without running anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunReload;

#[async_trait]
impl ReloadAction for DryRunReload {
    async fn reload(&self) -> Result<(), ReloadError> {
        tracing::info!("Dry run: reload suppressed");
        Ok(())
    }
}
