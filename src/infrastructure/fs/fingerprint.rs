//! Local Tree Fingerprinter
//!
//! Walks a build tree and records the content hash and size of every
//! regular file, keyed by its path relative to the tree root.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::entities::{FileRecord, Fingerprint, StateMapping};
use crate::domain::value_objects::{ContentHash, RelativePath};
use crate::error::{DeployError, DeployResult};

/// Computes the local state mapping of a build tree
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter {
    /// Root-level file names that are never part of the published state
    excluded_root_files: Vec<String>,
}

impl Fingerprinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a file at the tree root (e.g. a locally generated manifest)
    pub fn excluding(mut self, root_file_name: impl Into<String>) -> Self {
        self.excluded_root_files.push(root_file_name.into());
        self
    }

    /// Fingerprint every regular file under `root`
    ///
    /// Directories are not represented; symbolic links are not followed.
    /// A missing root is `SourceMissing`, never an empty mapping.
    pub fn scan(&self, root: &Path) -> DeployResult<StateMapping> {
        if !root.is_dir() {
            return Err(DeployError::SourceMissing {
                path: root.to_path_buf(),
            });
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut records = Vec::new();
        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let path = RelativePath::from_path(rel)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            if path.parent().is_none()
                && self
                    .excluded_root_files
                    .iter()
                    .any(|name| name == path.as_str())
            {
                continue;
            }

            records.push(FileRecord {
                path,
                fingerprint: fingerprint_file(entry.path())?,
            });
        }

        Ok(records.into_iter().collect())
    }
}

/// Hash one file, streaming its content
pub fn fingerprint_file(path: &Path) -> DeployResult<Fingerprint> {
    let file = File::open(path)?;
    let (hash, size) = ContentHash::from_reader(BufReader::new(file))?;
    Ok(Fingerprint::new(hash, size))
}

/// Absolute local path of a state entry
pub fn local_path(root: &Path, path: &RelativePath) -> PathBuf {
    path.as_str()
        .split('/')
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

fn walk_error(err: ignore::Error) -> DeployError {
    match err.into_io_error() {
        Some(io) => DeployError::Io(io),
        None => DeployError::Io(std::io::Error::other("directory walk failed")),
    }
}
