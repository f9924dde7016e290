//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! scan / resolve / reload / poll produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → journald / log aggregation
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```

pub mod logging;
pub mod metrics;
