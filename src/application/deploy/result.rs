//! Deploy Result
//!
//! Outcome of a completed deploy run.

use crate::domain::ports::ManifestStatus;

/// Report of a deploy run that reached the end (Commit, or Plan on dry run)
#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    /// Backend identifier
    pub backend: String,
    /// Target description (never contains credentials)
    pub target: String,
    /// How the previous manifest was obtained
    pub manifest_status: ManifestStatus,
    /// Number of local files fingerprinted
    pub scanned: usize,
    /// Files planned for upload, in path order
    pub planned_uploads: Vec<String>,
    /// Files planned for deletion
    pub planned_deletions: Vec<String>,
    /// Bytes the planned uploads transfer
    pub upload_bytes: u64,
    /// Files uploaded
    pub uploaded: Vec<String>,
    /// Files deleted (or already absent)
    pub deleted: Vec<String>,
    /// Deletions that failed and were left in place, with the reason
    pub skipped_deletions: Vec<(String, String)>,
    /// Local files that needed no action
    pub unchanged: usize,
    /// Whether the new manifest was written
    pub manifest_committed: bool,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl DeployReport {
    pub fn new(backend: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            target: target.into(),
            manifest_status: ManifestStatus::Missing,
            scanned: 0,
            planned_uploads: Vec::new(),
            planned_deletions: Vec::new(),
            upload_bytes: 0,
            uploaded: Vec::new(),
            deleted: Vec::new(),
            skipped_deletions: Vec::new(),
            unchanged: 0,
            manifest_committed: false,
            dry_run: false,
        }
    }

    /// Nothing needed to change
    pub fn is_noop(&self) -> bool {
        self.planned_uploads.is_empty() && self.planned_deletions.is_empty()
    }

    /// Every planned action was carried out
    pub fn is_clean(&self) -> bool {
        self.skipped_deletions.is_empty()
    }
}
