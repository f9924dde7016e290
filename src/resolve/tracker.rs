//! Per-hostname resolution change detection.
//!
//! # Design Decisions
//! - Address sets compare order-insensitively
//! - One record per hostname, overwritten on every successful lookup
//! - A failed lookup leaves the record untouched and reports an error

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::observability::metrics;
use crate::resolve::resolver::{ResolveError, Resolver};

/// Resolved addresses for a hostname. The address variant carries the family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet(BTreeSet<IpAddr>);

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> {
        self.0.iter()
    }

    pub fn ipv4_count(&self) -> usize {
        self.0.iter().filter(|ip| ip.is_ipv4()).count()
    }

    pub fn ipv6_count(&self) -> usize {
        self.0.iter().filter(|ip| ip.is_ipv6()).count()
    }
}

impl FromIterator<IpAddr> for AddressSet {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for AddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, ip) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ip)?;
        }
        write!(f, "]")
    }
}

/// Result of evaluating one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unchanged,
    Changed {
        /// `None` when the hostname had never been resolved before.
        previous: Option<AddressSet>,
        current: AddressSet,
    },
}

impl Resolution {
    pub fn is_changed(&self) -> bool {
        matches!(self, Resolution::Changed { .. })
    }
}

/// Remembers the last resolution of each hostname and detects changes.
pub struct ResolutionTracker {
    resolver: Arc<dyn Resolver>,
    records: HashMap<String, AddressSet>,
}

impl ResolutionTracker {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            records: HashMap::new(),
        }
    }

    /// Resolve `hostname`, compare against the stored record and overwrite it.
    pub async fn check_and_update(&mut self, hostname: &str) -> Result<Resolution, ResolveError> {
        let current = match self.resolver.resolve(hostname).await {
            Ok(set) => set,
            Err(e) => {
                metrics::record_resolution("error");
                return Err(e);
            }
        };

        let previous = self.records.insert(hostname.to_string(), current.clone());
        let resolution = match previous {
            Some(prev) if prev == current => Resolution::Unchanged,
            previous => Resolution::Changed { previous, current },
        };

        metrics::record_resolution(if resolution.is_changed() { "changed" } else { "unchanged" });
        Ok(resolution)
    }

    /// Last recorded address set for a hostname.
    pub fn record(&self, hostname: &str) -> Option<&AddressSet> {
        self.records.get(hostname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Hands out queued results per call.
    struct QueueResolver {
        answers: Mutex<Vec<Result<AddressSet, ()>>>,
    }

    impl QueueResolver {
        fn new(mut answers: Vec<Result<AddressSet, ()>>) -> Arc<Self> {
            answers.reverse();
            Arc::new(Self {
                answers: Mutex::new(answers),
            })
        }
    }

    #[async_trait]
    impl Resolver for QueueResolver {
        async fn resolve(&self, hostname: &str) -> Result<AddressSet, ResolveError> {
            let next = self.answers.lock().unwrap().pop().expect("no answer queued");
            next.map_err(|_| ResolveError::Lookup {
                hostname: hostname.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "nxdomain"),
            })
        }
    }

    fn set(ips: &[&str]) -> AddressSet {
        ips.iter().map(|ip| ip.parse::<IpAddr>().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_first_resolution_is_a_change_from_nothing() {
        let mut tracker = ResolutionTracker::new(QueueResolver::new(vec![Ok(set(&["10.0.0.1"]))]));
        let res = tracker.check_and_update("backend1.internal").await.unwrap();
        assert_eq!(
            res,
            Resolution::Changed {
                previous: None,
                current: set(&["10.0.0.1"]),
            }
        );
        assert_eq!(tracker.record("backend1.internal"), Some(&set(&["10.0.0.1"])));
    }

    #[tokio::test]
    async fn test_change_then_steady() {
        let mut tracker = ResolutionTracker::new(QueueResolver::new(vec![
            Ok(set(&["10.0.0.1"])),
            Ok(set(&["10.0.0.2"])),
            Ok(set(&["10.0.0.2"])),
        ]));
        tracker.check_and_update("h").await.unwrap();
        let second = tracker.check_and_update("h").await.unwrap();
        assert_eq!(
            second,
            Resolution::Changed {
                previous: Some(set(&["10.0.0.1"])),
                current: set(&["10.0.0.2"]),
            }
        );
        assert_eq!(tracker.check_and_update("h").await.unwrap(), Resolution::Unchanged);
        assert_eq!(tracker.record("h"), Some(&set(&["10.0.0.2"])));
        assert_eq!(tracker.record("other"), None);
    }

    #[tokio::test]
    async fn test_order_does_not_matter() {
        let mut tracker = ResolutionTracker::new(QueueResolver::new(vec![
            Ok(set(&["10.0.0.1", "10.0.0.2", "::1"])),
            Ok(set(&["::1", "10.0.0.2", "10.0.0.1"])),
        ]));
        tracker.check_and_update("h").await.unwrap();
        assert_eq!(tracker.check_and_update("h").await.unwrap(), Resolution::Unchanged);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_record() {
        let mut tracker = ResolutionTracker::new(QueueResolver::new(vec![
            Ok(set(&["10.0.0.1"])),
            Err(()),
            Ok(set(&["10.0.0.1"])),
        ]));
        tracker.check_and_update("h").await.unwrap();
        assert!(tracker.check_and_update("h").await.is_err());
        assert_eq!(tracker.record("h"), Some(&set(&["10.0.0.1"])));
        assert_eq!(tracker.check_and_update("h").await.unwrap(), Resolution::Unchanged);
    }

    #[tokio::test]
    async fn test_empty_resolution_is_distinct_from_failure() {
        let mut tracker = ResolutionTracker::new(QueueResolver::new(vec![
            Ok(set(&["10.0.0.1"])),
            Ok(AddressSet::new()),
        ]));
        tracker.check_and_update("h").await.unwrap();
        let res = tracker.check_and_update("h").await.unwrap();
        assert!(res.is_changed());
        assert_eq!(tracker.record("h"), Some(&AddressSet::new()));
    }

    #[test]
    fn test_address_set_display_and_families() {
        let s = set(&["10.0.0.2", "10.0.0.1", "fe80::1"]);
        assert_eq!(s.to_string(), "[10.0.0.1, 10.0.0.2, fe80::1]");
        assert_eq!(s.ipv4_count(), 2);
        assert_eq!(s.ipv6_count(), 1);
    }
}
