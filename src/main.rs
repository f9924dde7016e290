//! Upstream watcher daemon.
//!
//! Keeps a reverse proxy's view of its backends consistent with DNS by
//! reloading it whenever a backend hostname starts resolving differently.

use clap::Parser;

use upstream_watcher::config::Cli;
use upstream_watcher::lifecycle::signals::wait_for_shutdown_signal;
use upstream_watcher::observability::{logging, metrics};
use upstream_watcher::{PollLoop, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("upstream-watcher: {}", e);
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("upstream-watcher v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        directory = %config.directory.display(),
        interval_secs = config.interval_secs,
        reload_command = %config.reload.command.display(),
        resolve_timeout_secs = config.resolve_timeout_secs,
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Already validated by `into_config`.
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let shutdown = Shutdown::new();
    let poll = PollLoop::from_config(&config);
    let handle = tokio::spawn(poll.run(shutdown.subscribe()));

    match wait_for_shutdown_signal().await {
        Ok(()) => shutdown.trigger(),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signals"),
    }
    handle.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
