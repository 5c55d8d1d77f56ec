//! Error types for packdeploy
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::BackendError;
use crate::domain::value_objects::IgnoreError;

/// Result type alias for packdeploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for packing and deploying
///
/// Every variant except `Io` and `Ignore` corresponds to one fatal class of
/// the deploy run. Recoverable conditions (unreadable manifest, skipped
/// deletions) never surface here.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Required settings missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Local build tree does not exist
    #[error("local build directory not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Local build tree is empty while the target still holds published files
    #[error("local build directory {path} is empty; refusing to delete {recorded} published file(s)")]
    EmptySource { path: PathBuf, recorded: usize },

    /// Could not establish a backend session
    #[error("failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: BackendError,
    },

    /// A file upload failed; the run was aborted before commit
    #[error("upload of '{path}' failed: {source}")]
    Upload {
        path: String,
        #[source]
        source: BackendError,
    },

    /// A remote directory could not be created
    #[error("failed to create remote directory '{path}': {source}")]
    Directory {
        path: String,
        #[source]
        source: BackendError,
    },

    /// A batched deletion failed on a backend that cannot tolerate it
    #[error("deletion failed: {0}")]
    Deletion(#[source] BackendError),

    /// Uploads and deletions were applied but the new manifest was not written
    #[error("failed to write manifest '{path}': {source}")]
    ManifestWrite {
        path: String,
        #[source]
        source: BackendError,
    },

    /// Pack output location is unusable (e.g. it would wipe the project)
    #[error("invalid pack output {path}: {reason}")]
    PackOutput { path: PathBuf, reason: String },

    /// Malformed ignore pattern file
    #[error(transparent)]
    Ignore(#[from] IgnoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Whether the remote target may have been modified before this error occurred
    pub fn remote_touched(&self) -> bool {
        matches!(
            self,
            DeployError::Upload { .. }
                | DeployError::Directory { .. }
                | DeployError::Deletion(_)
                | DeployError::ManifestWrite { .. }
        )
    }

    /// What the operator can do next, if anything useful can be said
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DeployError::EmptySource { .. } => Some(
                "pass --allow-empty (or set DEPLOY_ALLOW_EMPTY=true) to remove every published file",
            ),
            DeployError::ManifestWrite { .. } => Some(
                "the target is ahead of its manifest; rerun deploy to record it",
            ),
            err if err.remote_touched() => Some(
                "the target was partly updated and its manifest is unchanged; rerun deploy to finish",
            ),
            _ => None,
        }
    }
}
