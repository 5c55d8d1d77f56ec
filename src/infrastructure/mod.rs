//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local build tree scanning
//! - `backends/` - Remote backends (bulk commands, SFTP, local directory)
//! - `repositories/` - Manifest persistence
//! - `events/` - Deploy event sinks (console, NDJSON)

pub mod backends;
pub mod events;
pub mod fs;
pub mod repositories;

// Re-export for convenience
pub use backends::{BulkCommandBackend, ConfiguredConnector, LocalDirBackend, SftpBackend};
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::Fingerprinter;
pub use repositories::{JsonManifestRepository, MANIFEST_FILE_NAME};
