//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! hostname
//!     → resolver.rs (system lookup under a deadline)
//!     → tracker.rs (compare with last record, overwrite)
//!     → Unchanged | Changed | error (treated as no change)
//! ```

pub mod resolver;
pub mod tracker;

pub use resolver::{ResolveError, Resolver, SystemResolver, TimeoutResolver};
pub use tracker::{AddressSet, Resolution, ResolutionTracker};
