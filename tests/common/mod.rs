//! Shared fakes for integration testing.

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use upstream_watcher::reload::{ReloadAction, ReloadError};
use upstream_watcher::resolve::{AddressSet, ResolveError, Resolver, TimeoutResolver};
use upstream_watcher::PollLoop;

/// Resolver whose answers are set by the test between cycles.
/// Unknown hostnames fail to resolve; stalled ones never answer.
#[derive(Default)]
pub struct ScriptedResolver {
    answers: Mutex<HashMap<String, AddressSet>>,
    stalled: Mutex<HashSet<String>>,
    lookups: AtomicUsize,
}

impl ScriptedResolver {
    pub fn set(&self, hostname: &str, ips: &[&str]) {
        let set = ips.iter().map(|ip| ip.parse::<IpAddr>().unwrap()).collect();
        self.answers.lock().unwrap().insert(hostname.to_string(), set);
    }

    #[allow(dead_code)]
    pub fn remove(&self, hostname: &str) {
        self.answers.lock().unwrap().remove(hostname);
    }

    #[allow(dead_code)]
    pub fn stall(&self, hostname: &str) {
        self.stalled.lock().unwrap().insert(hostname.to_string());
    }

    #[allow(dead_code)]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    async fn resolve(&self, hostname: &str) -> Result<AddressSet, ResolveError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let stalled = self.stalled.lock().unwrap().contains(hostname);
        if stalled {
            std::future::pending::<()>().await;
        }
        self.answers
            .lock()
            .unwrap()
            .get(hostname)
            .cloned()
            .ok_or_else(|| ResolveError::Lookup {
                hostname: hostname.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such host"),
            })
    }
}

/// Reload action that counts calls and plays back queued outcomes
/// (success once the queue is empty).
#[derive(Default)]
pub struct RecordingReload {
    calls: AtomicUsize,
    outcomes: Mutex<VecDeque<bool>>,
}

impl RecordingReload {
    #[allow(dead_code)]
    pub fn fail_next(&self, times: usize) {
        let mut outcomes = self.outcomes.lock().unwrap();
        for _ in 0..times {
            outcomes.push_back(false);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReloadAction for RecordingReload {
    async fn reload(&self) -> Result<(), ReloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let ok = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if ok {
            Ok(())
        } else {
            Err(ReloadError::Spawn {
                command: "/etc/init.d/nginx".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
            })
        }
    }
}

/// A poll loop over `dir` wired to fresh fakes.
pub fn poll_loop(dir: &Path) -> (PollLoop, Arc<ScriptedResolver>, Arc<RecordingReload>) {
    let resolver = Arc::new(ScriptedResolver::default());
    let reload = Arc::new(RecordingReload::default());
    let poll = PollLoop::new(dir, Duration::from_secs(3600), resolver.clone(), reload.clone());
    (poll, resolver, reload)
}

/// Like [`poll_loop`], with every lookup bounded by `timeout`.
#[allow(dead_code)]
pub fn poll_loop_with_timeout(
    dir: &Path,
    timeout: Duration,
) -> (PollLoop, Arc<ScriptedResolver>, Arc<RecordingReload>) {
    let resolver = Arc::new(ScriptedResolver::default());
    let reload = Arc::new(RecordingReload::default());
    let bounded = Arc::new(TimeoutResolver::new(resolver.clone(), timeout));
    let poll = PollLoop::new(dir, Duration::from_secs(3600), bounded, reload.clone());
    (poll, resolver, reload)
}
