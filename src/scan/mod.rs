//! Configuration scanning subsystem.
//!
//! # Data Flow
//! ```text
//! watched directory
//!     → directory.rs (list, skip hidden, per-file state)
//!     → checksum.rs (fingerprint, unchanged files stop here)
//!     → extract.rs (backend entries + hostnames for new/changed files)
//!     → combined entry set for the cycle
//! ```
//!
//! # Design Decisions
//! - Entries are kept per file and recombined each cycle
//! - A file is re-read only when its fingerprint changes
//! - Unreadable files and a missing directory never abort the cycle

pub mod checksum;
pub mod directory;
pub mod extract;

pub use checksum::{ChecksumStore, Fingerprint};
pub use directory::{DirectoryScanner, ScanError, ScanReport};
pub use extract::BackendEntry;
