//! Sync planning service
//!
//! Pure domain logic for planning an incremental deploy.
//! Given the local state, the previously published manifest, and the
//! force-full flag, this service determines which files to upload and which
//! to delete, without performing any I/O.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::entities::StateMapping;
use crate::domain::value_objects::RelativePath;

/// Why a file is going to be uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadReason {
    /// Not recorded in the previous manifest
    New,
    /// Recorded with a different hash
    Changed,
    /// Unchanged, but the operator forced a full resync
    Forced,
}

impl UploadReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadReason::New => "new",
            UploadReason::Changed => "changed",
            UploadReason::Forced => "forced",
        }
    }
}

impl fmt::Display for UploadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of planning a deploy
///
/// Both sets are keyed and sorted, so the plan depends only on its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Files to upload, with the reason each one was selected
    pub uploads: BTreeMap<RelativePath, UploadReason>,
    /// Files recorded in the manifest that no longer exist locally
    pub deletions: Vec<RelativePath>,
    /// Local files that need no action
    pub unchanged: usize,
}

impl SyncPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletions.is_empty()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.len()
    }

    pub fn deletion_count(&self) -> usize {
        self.deletions.len()
    }

    /// Iterate uploads in path order
    pub fn uploads(&self) -> impl Iterator<Item = (&RelativePath, UploadReason)> {
        self.uploads.iter().map(|(path, reason)| (path, *reason))
    }

    /// Count uploads selected for a given reason
    pub fn count_reason(&self, reason: UploadReason) -> usize {
        self.uploads.values().filter(|r| **r == reason).count()
    }

    /// Bytes that will be transferred, according to the local state
    pub fn upload_bytes(&self, local: &StateMapping) -> u64 {
        self.uploads
            .keys()
            .filter_map(|path| local.get(path))
            .map(|fp| fp.size())
            .sum()
    }
}

/// Pure planning service
///
/// No filesystem operations - all I/O is done by the caller.
pub struct Planner;

impl Planner {
    /// Plan a deploy
    ///
    /// # Arguments
    /// * `local` - Fingerprints of the local build tree
    /// * `manifest` - State recorded by the previous successful deploy
    /// * `force_full` - Re-upload every local file regardless of hash
    ///
    /// Only paths recorded in `manifest` are ever candidates for deletion.
    pub fn plan(local: &StateMapping, manifest: &StateMapping, force_full: bool) -> SyncPlan {
        let mut plan = SyncPlan::new();

        for (path, fingerprint) in local.iter() {
            let reason = match manifest.get(path) {
                None => Some(UploadReason::New),
                Some(_) if force_full => Some(UploadReason::Forced),
                Some(recorded) if recorded.hash() != fingerprint.hash() => {
                    Some(UploadReason::Changed)
                }
                Some(_) => None,
            };

            match reason {
                Some(reason) => {
                    plan.uploads.insert(path.clone(), reason);
                }
                None => plan.unchanged += 1,
            }
        }

        plan.deletions = manifest
            .paths()
            .filter(|path| !local.contains(path))
            .cloned()
            .collect();

        plan
    }
}
