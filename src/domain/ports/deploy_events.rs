//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables progress reporting, JSON event streams, and debugging.
//! Sinks are purely observational: they cannot fail a run.

use std::path::PathBuf;

use crate::domain::ports::ManifestStatus;
use crate::domain::services::UploadReason;

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Deploy started
    Started {
        source: PathBuf,
        destination: String,
        backend: String,
        force_full: bool,
        dry_run: bool,
    },

    /// Backend session established
    Connected { backend: String },

    /// Local tree fingerprinted
    Scanned { file_count: usize, total_bytes: u64 },

    /// Previous manifest read (or degraded to empty)
    ManifestLoaded {
        status: ManifestStatus,
        entries: usize,
    },

    /// Plan computed
    Planned {
        uploads: usize,
        deletions: usize,
        unchanged: usize,
        upload_bytes: u64,
    },

    /// A stale file was removed from the remote target
    Deleted { path: String },

    /// A stale file could not be removed and was left in place
    DeleteSkipped { path: String, error: String },

    /// File upload started
    UploadStarted {
        index: usize,
        total: usize,
        path: String,
        reason: UploadReason,
        size: u64,
    },

    /// Throttled transfer progress for the current upload
    UploadProgress {
        path: String,
        bytes_done: u64,
        bytes_total: u64,
    },

    /// File uploaded successfully
    Uploaded { index: usize, path: String },

    /// New manifest written
    ManifestCommitted { entries: usize },

    /// Deploy completed
    Completed {
        uploaded: usize,
        deleted: usize,
        skipped_deletions: usize,
        unchanged: usize,
        dry_run: bool,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants detailed events (e.g., per-file)
    ///
    /// Some sinks (like CI) may only want summary events.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
