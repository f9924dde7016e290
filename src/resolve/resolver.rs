//! Hostname resolution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time;

use crate::resolve::tracker::AddressSet;

/// Errors from a single resolution attempt.
///
/// Distinct from a successful lookup that returned no addresses.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The system resolver rejected the lookup.
    #[error("failed to resolve {hostname}: {source}")]
    Lookup {
        hostname: String,
        #[source]
        source: std::io::Error,
    },

    /// The lookup did not finish within the configured deadline.
    #[error("resolution of {hostname} timed out after {timeout:?}")]
    Timeout { hostname: String, timeout: Duration },
}

/// Source of address sets for hostnames.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> Result<AddressSet, ResolveError>;
}

/// Resolver backed by the operating system (getaddrinfo).
///
/// Unbounded on its own; wrap it in [`TimeoutResolver`].
#[derive(Debug, Clone, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> Result<AddressSet, ResolveError> {
        tokio::net::lookup_host((hostname, 0))
            .await
            .map(|addrs| addrs.map(|addr| addr.ip()).collect())
            .map_err(|source| ResolveError::Lookup {
                hostname: hostname.to_string(),
                source,
            })
    }
}

/// Puts a deadline on every lookup of an inner resolver.
pub struct TimeoutResolver {
    inner: Arc<dyn Resolver>,
    timeout: Duration,
}

impl TimeoutResolver {
    pub fn new(inner: Arc<dyn Resolver>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl Resolver for TimeoutResolver {
    async fn resolve(&self, hostname: &str) -> Result<AddressSet, ResolveError> {
        match time::timeout(self.timeout, self.inner.resolve(hostname)).await {
            Ok(result) => result,
            Err(_) => Err(ResolveError::Timeout {
                hostname: hostname.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}
