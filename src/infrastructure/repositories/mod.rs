//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod manifest;

pub use manifest::{JsonManifestRepository, MANIFEST_FILE_NAME};
