//! State mapping entity - relative path to content fingerprint
//!
//! Built either by fingerprinting the local tree or by decoding the remote
//! manifest. It's a pure data structure - I/O is handled by the fingerprinter
//! and the manifest store.

use std::collections::BTreeMap;

use crate::domain::value_objects::{ContentHash, RelativePath};

/// Hash and size of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    hash: ContentHash,
    size: u64,
}

impl Fingerprint {
    pub fn new(hash: impl Into<ContentHash>, size: u64) -> Self {
        Self {
            hash: hash.into(),
            size,
        }
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A single published file: path plus fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: RelativePath,
    pub fingerprint: Fingerprint,
}

/// Mapping of relative path to fingerprint
///
/// Keys are unique; iteration is always in sorted key order so anything
/// derived from a mapping is independent of how it was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMapping {
    entries: BTreeMap<RelativePath, Fingerprint>,
}

impl StateMapping {
    /// Create a new empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert or replace a fingerprint, returning the previous one
    pub fn insert(&mut self, path: RelativePath, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.entries.insert(path, fingerprint)
    }

    pub fn get(&self, path: &RelativePath) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &Fingerprint)> {
        self.entries.iter()
    }

    /// Iterate as owned records
    pub fn records(&self) -> impl Iterator<Item = FileRecord> + '_ {
        self.entries.iter().map(|(path, fingerprint)| FileRecord {
            path: path.clone(),
            fingerprint: fingerprint.clone(),
        })
    }

    /// Sum of all recorded sizes
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(Fingerprint::size).sum()
    }
}

impl FromIterator<FileRecord> for StateMapping {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|record| (record.path, record.fingerprint))
                .collect(),
        }
    }
}
