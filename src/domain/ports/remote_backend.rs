//! Remote Backend Port
//!
//! Abstracts the remote filesystem a build is published to. The deploy use
//! case only ever hands a backend relative paths; resolving them against the
//! remote base directory, sessions, and transport tuning are the backend's
//! business.

use std::path::Path;

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error during a remote operation
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote path does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// Session could not be established or was lost
    #[error("connection error: {0}")]
    Connection(String),
    /// A shell-level command exited unsuccessfully
    #[error("command failed: {0}")]
    CommandFailed(String),
    /// A required tool or capability is missing
    #[error("not available: {0}")]
    NotAvailable(String),
    /// Protocol-level failure reported by the remote side
    #[error("remote error: {0}")]
    Remote(String),
    /// Local I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// Outcome of a multi-path deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Paths removed (or already absent)
    pub deleted: Vec<String>,
    /// Paths that could not be removed, with the reason
    pub skipped: Vec<(String, String)>,
    /// Number of backend calls issued
    pub batches: usize,
}

/// Trait for remote backends
///
/// Implementations:
/// - `BulkCommandBackend` - batched `ssh` commands and `rsync` transfers
/// - `SftpBackend` - one SFTP request per file operation
/// - `LocalDirBackend` - a directory on a local or mounted filesystem
///
/// Every call blocks until the operation has completed or failed.
pub trait RemoteBackend {
    /// Short backend identifier (for logging)
    fn name(&self) -> &'static str;

    /// Human-readable description of the target (never contains secrets)
    fn describe(&self) -> String;

    /// Read a small blob; `NotFound` when it does not exist
    fn read_blob(&self, path: &str) -> BackendResult<Vec<u8>>;

    /// Write a small blob, replacing any previous content
    fn write_blob(&self, path: &str, content: &[u8]) -> BackendResult<()>;

    /// Create a directory and all missing parents; idempotent
    ///
    /// The empty path denotes the remote base directory itself.
    fn ensure_directory(&self, path: &str) -> BackendResult<()>;

    /// Upload a local file, reporting `(bytes_done, bytes_total)` as it goes
    fn upload(
        &self,
        local: &Path,
        remote: &str,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> BackendResult<()>;

    /// Delete a single file; `NotFound` when it was already gone
    fn delete_one(&self, path: &str) -> BackendResult<()>;

    /// Delete many files
    ///
    /// The default policy treats every path independently: a missing file
    /// counts as deleted and any other failure is recorded and skipped.
    /// Backends that can only fail at batch granularity override this and
    /// return an error instead.
    fn delete_many(&self, paths: &[String]) -> BackendResult<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();
        for path in paths {
            outcome.batches += 1;
            match self.delete_one(path) {
                Ok(()) => outcome.deleted.push(path.clone()),
                Err(e) if e.is_not_found() => outcome.deleted.push(path.clone()),
                Err(e) => outcome.skipped.push((path.clone(), e.to_string())),
            }
        }
        Ok(outcome)
    }
}

/// Opens backend sessions
///
/// Kept separate from `RemoteBackend` so that acquiring a session is an
/// explicit, fallible step of a deploy run.
pub trait BackendConnector {
    /// Identifier of the backend this connector opens
    fn backend_name(&self) -> &'static str;

    /// Description of the target for reporting
    fn target(&self) -> String;

    /// Establish a live session
    fn connect(&self) -> BackendResult<Box<dyn RemoteBackend>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FlakyBackend {
        removed: RefCell<Vec<String>>,
    }

    impl RemoteBackend for FlakyBackend {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn read_blob(&self, path: &str) -> BackendResult<Vec<u8>> {
            Err(BackendError::NotFound(path.to_string()))
        }

        fn write_blob(&self, _path: &str, _content: &[u8]) -> BackendResult<()> {
            Ok(())
        }

        fn ensure_directory(&self, _path: &str) -> BackendResult<()> {
            Ok(())
        }

        fn upload(
            &self,
            _local: &Path,
            _remote: &str,
            _on_progress: &mut dyn FnMut(u64, u64),
        ) -> BackendResult<()> {
            Ok(())
        }

        fn delete_one(&self, path: &str) -> BackendResult<()> {
            match path {
                "gone.txt" => Err(BackendError::NotFound(path.to_string())),
                "locked.txt" => Err(BackendError::Remote("permission denied".to_string())),
                _ => {
                    self.removed.borrow_mut().push(path.to_string());
                    Ok(())
                }
            }
        }
    }

    #[test]
    fn default_delete_many_tolerates_item_failures() {
        let backend = FlakyBackend {
            removed: RefCell::new(Vec::new()),
        };
        let paths = vec![
            "a.txt".to_string(),
            "locked.txt".to_string(),
            "gone.txt".to_string(),
            "b.txt".to_string(),
        ];

        let outcome = backend.delete_many(&paths).unwrap();

        assert_eq!(outcome.deleted, vec!["a.txt", "gone.txt", "b.txt"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].0, "locked.txt");
        assert!(outcome.skipped[0].1.contains("permission denied"));
        assert_eq!(outcome.batches, 4);
        assert_eq!(*backend.removed.borrow(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn not_found_is_distinguished() {
        assert!(BackendError::NotFound("x".to_string()).is_not_found());
        assert!(!BackendError::Connection("x".to_string()).is_not_found());
    }
}
