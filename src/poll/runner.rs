//! The detect-and-gate loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::WatcherConfig;
use crate::observability::metrics;
use crate::reload::{CommandReload, CycleState, DryRunReload, GateReport, ReloadAction, RestartGate};
use crate::resolve::{ResolutionTracker, Resolver, SystemResolver, TimeoutResolver};
use crate::scan::{DirectoryScanner, ScanReport};

/// Everything that happened in one cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub number: u64,
    /// Whether this was the baseline cycle.
    pub first: bool,
    pub scan: ScanReport,
    pub gate: GateReport,
}

/// Owns all cross-cycle state: checksums, per-file entries, resolution
/// records and the cycle flags.
pub struct PollLoop {
    scanner: DirectoryScanner,
    tracker: ResolutionTracker,
    gate: RestartGate,
    cycle: CycleState,
    interval: Duration,
    completed: u64,
}

impl PollLoop {
    pub fn new(
        directory: impl Into<PathBuf>,
        interval: Duration,
        resolver: Arc<dyn Resolver>,
        action: Arc<dyn ReloadAction>,
    ) -> Self {
        Self {
            scanner: DirectoryScanner::new(directory),
            tracker: ResolutionTracker::new(resolver),
            gate: RestartGate::new(action),
            cycle: CycleState::new(),
            interval,
            completed: 0,
        }
    }

    /// Wire the system resolver and the configured reload action.
    pub fn from_config(config: &WatcherConfig) -> Self {
        let resolver = Arc::new(TimeoutResolver::new(
            Arc::new(SystemResolver),
            config.resolve_timeout(),
        ));
        let action: Arc<dyn ReloadAction> = if config.dry_run {
            Arc::new(DryRunReload)
        } else {
            Arc::new(CommandReload::new(
                config.reload.command.clone(),
                config.reload.argument.clone(),
            ))
        };
        Self::new(config.directory.clone(), config.interval(), resolver, action)
    }

    pub fn is_first_cycle(&self) -> bool {
        self.cycle.is_first_cycle
    }

    pub fn cycles_completed(&self) -> u64 {
        self.completed
    }

    /// Run one full pass: scan, evaluate, maybe reload.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle.begin();
        let first = self.cycle.is_first_cycle;

        let scan = self.scanner.scan();
        metrics::record_tracked_entries(scan.entries.len());

        let gate = self
            .gate
            .maybe_restart(&mut self.cycle, &scan.entries, &mut self.tracker)
            .await;

        self.cycle.finish();
        self.completed += 1;
        metrics::record_cycle();

        tracing::info!(
            cycle = self.completed,
            files = scan.files.len(),
            extracted = scan.extracted.len(),
            entries = scan.entries.len(),
            changed = gate.changed.len(),
            reloaded = gate.reloaded,
            "Cycle complete"
        );

        CycleReport {
            number: self.completed,
            first,
            scan,
            gate,
        }
    }

    /// Run cycles until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            directory = %self.scanner.directory().display(),
            interval_secs = self.interval.as_secs(),
            "Poll loop starting"
        );

        loop {
            self.run_cycle().await;

            tracing::debug!(seconds = self.interval.as_secs(), "Sleeping");
            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Poll loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
