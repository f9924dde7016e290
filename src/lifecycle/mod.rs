//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → poll loop leaves its wait → run() returns → exit
//! ```
//!
//! # Design Decisions
//! - Only the timed wait between cycles observes shutdown; a cycle in
//!   progress finishes first
//! - No state is persisted, so there is nothing to flush on exit

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
