//! Upstream watcher library.
//!
//! Watches a reverse proxy's site configuration directory for backend
//! hostnames, re-resolves them every cycle and reloads the proxy when a
//! backend's address set changes.
//!
//! ```text
//!  sites-enabled/ ──▶ scan ──▶ entries ──▶ resolve ──▶ reload gate ──▶ init script
//!                    (checksum,          (per-host    (≤1 per cycle,    `restart`
//!                     extract)            records)     none on first)
//! ```

// Detect-and-gate core
pub mod poll;
pub mod reload;
pub mod resolve;
pub mod scan;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::WatcherConfig;
pub use lifecycle::Shutdown;
pub use poll::PollLoop;
