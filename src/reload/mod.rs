//! Reload subsystem.
//!
//! # Data Flow
//! ```text
//! cycle entries (in order)
//!     → gate.rs (stop after first successful reload, baseline on first cycle)
//!     → resolve::ResolutionTracker (changed?)
//!     → action.rs (init script `restart`, or dry-run log)
//! ```
//!
//! # Design Decisions
//! - The reload action is opaque: zero exit status is success, anything else failure
//! - Dry run swaps the action, never the gating

pub mod action;
pub mod gate;

pub use action::{CommandReload, DryRunReload, ReloadAction, ReloadError};
pub use gate::{CycleState, GateReport, RestartGate};
