//! ManifestRepository port - abstraction for manifest persistence
//!
//! The manifest is the record of what was last published to a remote
//! target. This trait lets the deploy use case load and replace it without
//! knowing about the wire format.

use std::fmt;

use crate::domain::entities::StateMapping;
use crate::domain::ports::{BackendError, RemoteBackend};

/// How the previous manifest was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    /// Decoded successfully
    Loaded,
    /// No manifest on the target (first deploy)
    Missing,
    /// Present but not decodable
    Corrupt(String),
    /// Could not be read for another reason
    Unreadable(String),
}

impl ManifestStatus {
    /// Whether the run starts from an empty prior state
    pub fn is_fresh(&self) -> bool {
        !matches!(self, ManifestStatus::Loaded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ManifestStatus::Loaded => "loaded",
            ManifestStatus::Missing => "missing",
            ManifestStatus::Corrupt(_) => "corrupt",
            ManifestStatus::Unreadable(_) => "unreadable",
        }
    }

    /// Underlying reason for a degraded load
    pub fn detail(&self) -> Option<&str> {
        match self {
            ManifestStatus::Corrupt(msg) | ManifestStatus::Unreadable(msg) => Some(msg),
            ManifestStatus::Loaded | ManifestStatus::Missing => None,
        }
    }
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestStatus::Loaded => write!(f, "loaded"),
            ManifestStatus::Missing => write!(f, "not found"),
            ManifestStatus::Corrupt(msg) => write!(f, "corrupt ({})", msg),
            ManifestStatus::Unreadable(msg) => write!(f, "unreadable ({})", msg),
        }
    }
}

/// Result of loading a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestLoad {
    pub state: StateMapping,
    pub status: ManifestStatus,
}

impl ManifestLoad {
    pub fn empty(status: ManifestStatus) -> Self {
        Self {
            state: StateMapping::new(),
            status,
        }
    }
}

/// Abstract repository for the remote manifest
pub trait ManifestRepository {
    /// Remote path of the manifest, relative to the target root
    fn path(&self) -> &str;

    /// Load the previous manifest
    ///
    /// Missing, unreadable and corrupt manifests degrade to an empty
    /// mapping. Only a lost session (`BackendError::Connection`) is returned
    /// as an error: treating it as empty would commit a manifest that forgets
    /// every stale path.
    fn load(&self, backend: &dyn RemoteBackend) -> Result<ManifestLoad, BackendError>;

    /// Replace the manifest with the given state
    fn save(&self, backend: &dyn RemoteBackend, state: &StateMapping) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_loaded_is_not_fresh() {
        assert!(!ManifestStatus::Loaded.is_fresh());
        assert!(ManifestStatus::Missing.is_fresh());
        assert!(ManifestStatus::Corrupt("eof".to_string()).is_fresh());
        assert!(ManifestStatus::Unreadable("timeout".to_string()).is_fresh());
    }

    #[test]
    fn status_display_includes_reason() {
        let status = ManifestStatus::Corrupt("expected value at line 1".to_string());
        assert_eq!(status.to_string(), "corrupt (expected value at line 1)");
        assert_eq!(status.label(), "corrupt");
    }
}
