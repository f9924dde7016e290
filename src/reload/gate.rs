//! Restart gate.
//!
//! # Rules
//! - At most one successful reload per cycle; once it happens the remaining
//!   entries of the cycle are not evaluated
//! - Never reload on the first cycle, it only records the baseline
//! - A failed reload leaves the flag clear, so a later change in the same
//!   cycle may try again

use std::sync::Arc;

use crate::observability::metrics;
use crate::reload::action::ReloadAction;
use crate::resolve::{Resolution, ResolutionTracker};
use crate::scan::BackendEntry;

/// Flags scoped to the daemon's lifetime and to the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    pub is_first_cycle: bool,
    pub has_restarted_this_cycle: bool,
}

impl CycleState {
    pub fn new() -> Self {
        Self {
            is_first_cycle: true,
            has_restarted_this_cycle: false,
        }
    }

    /// Start of every cycle.
    pub fn begin(&mut self) {
        self.has_restarted_this_cycle = false;
    }

    /// End of every cycle; the first cycle is over for good.
    pub fn finish(&mut self) {
        self.is_first_cycle = false;
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the gate did during one cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GateReport {
    /// Entries whose hostname was resolved.
    pub evaluated: usize,
    /// Entries left unevaluated after a successful reload.
    pub skipped: usize,
    /// Hostnames whose address set changed.
    pub changed: Vec<String>,
    /// Hostnames that failed to resolve.
    pub resolution_failures: Vec<String>,
    /// Reload invocations, successful or not.
    pub reload_attempts: usize,
    /// Whether a reload succeeded this cycle.
    pub reloaded: bool,
}

/// Decides when the reload action runs.
pub struct RestartGate {
    action: Arc<dyn ReloadAction>,
}

impl RestartGate {
    pub fn new(action: Arc<dyn ReloadAction>) -> Self {
        Self { action }
    }

    /// Evaluate `entries` in order and reload at most once.
    pub async fn maybe_restart(
        &self,
        cycle: &mut CycleState,
        entries: &[BackendEntry],
        tracker: &mut ResolutionTracker,
    ) -> GateReport {
        let mut report = GateReport::default();

        for (i, entry) in entries.iter().enumerate() {
            if cycle.has_restarted_this_cycle {
                report.skipped = entries.len() - i;
                break;
            }

            let hostname = entry.hostname.as_str();
            report.evaluated += 1;

            let resolution = match tracker.check_and_update(hostname).await {
                Ok(resolution) => resolution,
                Err(e) => {
                    tracing::warn!(hostname, error = %e, "Resolution failed, treating as unchanged");
                    report.resolution_failures.push(hostname.to_string());
                    continue;
                }
            };

            let (previous, current) = match resolution {
                Resolution::Unchanged => {
                    tracing::debug!(hostname, "No change to hostname");
                    continue;
                }
                Resolution::Changed { previous, current } => (previous, current),
            };

            report.changed.push(hostname.to_string());
            let previous = previous.map(|p| p.to_string()).unwrap_or_else(|| "none".to_string());

            if cycle.is_first_cycle {
                tracing::debug!(hostname, addresses = %current, "Not reloading, first iteration");
                continue;
            }

            tracing::info!(hostname, previous = %previous, current = %current, "Backend has changed IP, reloading");
            report.reload_attempts += 1;
            match self.action.reload().await {
                Ok(()) => {
                    metrics::record_reload("success");
                    cycle.has_restarted_this_cycle = true;
                    report.reloaded = true;
                }
                Err(e) => {
                    metrics::record_reload("failure");
                    tracing::error!(hostname, error = %e, "Reload failed, loop continuing");
                }
            }
        }

        report
    }
}
