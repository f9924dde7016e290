//! Content fingerprints for tracked configuration files.
//!
//! # Responsibilities
//! - Digest a file's full content in bounded-size chunks
//! - Remember the last digest seen per file name
//! - Report whether a file is new or changed (check-and-set)

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Size of each read when streaming a file into the hasher.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Fixed-size digest of a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hex rendering, used in logs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough to tell revisions apart in a log line.
        write!(f, "{}", &self.to_hex()[..12])
    }
}

/// Compute the fingerprint of a file, reading at most `CHUNK_SIZE` bytes at a time.
pub fn fingerprint(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    fingerprint_reader(&mut file)
}

/// Compute the fingerprint of any reader.
pub fn fingerprint_reader<R: Read>(reader: &mut R) -> io::Result<Fingerprint> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Ok(Fingerprint(digest))
}

/// Last-seen fingerprint per file name.
#[derive(Debug, Default)]
pub struct ChecksumStore {
    digests: HashMap<String, Fingerprint>,
}

impl ChecksumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `file_name` is unseen or its digest differs from the stored one.
    ///
    /// On true the stored digest is replaced with `digest`.
    pub fn has_changed(&mut self, file_name: &str, digest: Fingerprint) -> bool {
        match self.digests.get(file_name) {
            Some(stored) if *stored == digest => false,
            _ => {
                self.digests.insert(file_name.to_string(), digest);
                true
            }
        }
    }

    /// Stored digest for a file, if it has been seen.
    pub fn get(&self, file_name: &str) -> Option<Fingerprint> {
        self.digests.get(file_name).copied()
    }

    /// Drop the stored digest so the next check reports a change.
    pub fn forget(&mut self, file_name: &str) {
        self.digests.remove(file_name);
    }
}
