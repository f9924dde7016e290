//! Poll loop subsystem.
//!
//! # States
//! ```text
//! (start) → Scanning → Idle → Scanning → Idle → ...
//!
//! Scanning: scan directory → evaluate entries → gated reload
//! Idle:     timed wait, interrupted only by shutdown
//! ```
//!
//! # Design Decisions
//! - One cycle runs strictly sequentially; no parallelism across files or hostnames
//! - The wait starts after a cycle completes, so a slow cycle delays the next one
//! - All cross-cycle state lives in `PollLoop` and is never shared

pub mod runner;

pub use runner::{CycleReport, PollLoop};
