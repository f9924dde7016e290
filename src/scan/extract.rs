//! Backend entry extraction from free-text configuration.
//!
//! This is a line-level heuristic, not a configuration parser. A backend
//! entry is any single-line fragment that starts at the token `server`,
//! contains a `:` and ends at the last space on the line. The hostname is
//! the space-delimited token immediately before the last qualifying colon.
//!
//! # Known limits
//! - `server host:80;` (no space after the port) is not matched
//! - IPv6 literals and multiple colons resolve to the text before the last colon
//! - A fragment with no space before its colon (e.g. `server:80 x `) keeps
//!   the whole fragment as its hostname
//! - Hostnames are never validated; an unusable one simply fails to resolve

use std::sync::OnceLock;

use regex::Regex;

/// One extracted backend directive fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEntry {
    /// The raw matched text.
    pub raw: String,
    /// Hostname derived from `raw`.
    pub hostname: String,
}

impl BackendEntry {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let hostname = derive_hostname(&raw);
        Self { raw, hostname }
    }
}

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"server.*:.* ").expect("static entry pattern is valid"))
}

fn hostname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^.* (.*):.* .*$").expect("static hostname pattern is valid"))
}

/// Extract every backend entry from configuration text, in file order.
pub fn extract(text: &str) -> Vec<BackendEntry> {
    entry_pattern()
        .find_iter(text)
        .map(|m| BackendEntry::new(m.as_str()))
        .collect()
}

/// Derive the hostname from a matched fragment.
///
/// Falls back to the fragment itself when the shape does not fit.
pub fn derive_hostname(raw: &str) -> String {
    match hostname_pattern().captures(raw) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}
