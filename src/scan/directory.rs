//! Watched-directory scanning.
//!
//! # Responsibilities
//! - List the watched directory once per cycle
//! - Skip hidden names and non-regular entries
//! - Fingerprint each file and re-extract only new or changed ones
//! - Combine the per-file entry lists into the cycle's entry set

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::observability::metrics;
use crate::scan::checksum::{fingerprint, ChecksumStore};
use crate::scan::extract::{extract, BackendEntry};

/// Errors raised while scanning. None of them stop the cycle.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The watched directory could not be listed.
    #[error("directory {path} unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single file could not be fingerprinted or read.
    #[error("file {path} unreadable: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::DirectoryUnavailable { .. } => "directory_unavailable",
            ScanError::FileUnreadable { .. } => "file_unreadable",
        }
    }
}

/// Outcome of one directory pass.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Regular, non-hidden files present in this listing (sorted).
    pub files: Vec<String>,
    /// Hidden names skipped.
    pub hidden_skipped: usize,
    /// Files whose content was (re-)extracted this pass.
    pub extracted: Vec<String>,
    /// Errors encountered; the affected files are left out of `entries`.
    pub errors: Vec<ScanError>,
    /// The combined entry set for this cycle, in file-name order.
    pub entries: Vec<BackendEntry>,
}

/// Scans one directory and keeps per-file state between passes.
#[derive(Debug)]
pub struct DirectoryScanner {
    directory: PathBuf,
    checksums: ChecksumStore,
    /// Last extraction result per file name. Never pruned; a file that
    /// disappears simply stops contributing while it is absent.
    tracked: BTreeMap<String, Vec<BackendEntry>>,
}

impl DirectoryScanner {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            checksums: ChecksumStore::new(),
            tracked: BTreeMap::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of file names ever tracked.
    pub fn tracked_files(&self) -> usize {
        self.tracked.len()
    }

    /// Run one pass over the directory.
    pub fn scan(&mut self) -> ScanReport {
        let mut report = ScanReport::default();

        let names = match self.list() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(
                    directory = %self.directory.display(),
                    error = %e,
                    "Directory unavailable, skipping check on this run"
                );
                metrics::record_scan_error(e.kind());
                report.errors.push(e);
                return report;
            }
        };

        for Listed { name, path, hidden } in names {
            if hidden {
                tracing::debug!(file = %name, "Skipping hidden file");
                report.hidden_skipped += 1;
                continue;
            }

            match self.visit(&name, &path) {
                Ok(Visit::Skipped) => {}
                Ok(Visit::Unchanged) => report.files.push(name),
                Ok(Visit::Extracted) => {
                    report.extracted.push(name.clone());
                    report.files.push(name);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable file this cycle");
                    metrics::record_scan_error(e.kind());
                    report.errors.push(e);
                }
            }
        }

        report.entries = report
            .files
            .iter()
            .filter_map(|name| self.tracked.get(name))
            .flatten()
            .cloned()
            .collect();

        report
    }

    /// Directory listing, sorted by name for a stable entry order.
    ///
    /// Paths keep the raw file name; the lossy `name` is only a key and a label.
    fn list(&self) -> Result<Vec<Listed>, ScanError> {
        let unavailable = |source| ScanError::DirectoryUnavailable {
            path: self.directory.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            let raw = entry.file_name();
            names.push(Listed {
                name: raw.to_string_lossy().into_owned(),
                hidden: raw.as_encoded_bytes().starts_with(b"."),
                path: entry.path(),
            });
        }
        names.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(names)
    }

    fn visit(&mut self, name: &str, path: &Path) -> Result<Visit, ScanError> {
        let unreadable = |source| ScanError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        };

        // Follows symlinks; sites-enabled style directories are mostly links.
        let meta = fs::metadata(path).map_err(unreadable)?;
        if !meta.is_file() {
            tracing::debug!(file = %path.display(), "Skipping non-regular entry");
            return Ok(Visit::Skipped);
        }

        let digest = fingerprint(path).map_err(unreadable)?;
        let is_new = self.checksums.get(name).is_none();
        if !self.checksums.has_changed(name, digest) {
            return Ok(Visit::Unchanged);
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Retry extraction next cycle instead of trusting the new digest.
                self.checksums.forget(name);
                return Err(unreadable(e));
            }
        };
        let entries = extract(&String::from_utf8_lossy(&bytes));

        if is_new {
            tracing::debug!(file = %path.display(), entries = entries.len(), "New config file detected");
        } else {
            tracing::debug!(
                file = %path.display(),
                checksum = %digest,
                entries = entries.len(),
                "New checksum detected, re-extracting"
            );
        }
        metrics::record_file_extracted();
        self.tracked.insert(name.to_string(), entries);
        Ok(Visit::Extracted)
    }
}

struct Listed {
    name: String,
    path: PathBuf,
    hidden: bool,
}

enum Visit {
    Skipped,
    Unchanged,
    Extracted,
}
