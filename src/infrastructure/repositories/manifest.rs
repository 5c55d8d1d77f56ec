//! JSON Manifest Repository
//!
//! Implements the ManifestRepository port using a JSON document stored on
//! the remote target:
//!
//! ```json
//! { "mods/a.jar": { "hash": "sha256:…", "size": 1234 } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{FileRecord, Fingerprint, StateMapping};
use crate::domain::ports::{
    BackendError, ManifestLoad, ManifestRepository, ManifestStatus, RemoteBackend,
};
use crate::domain::value_objects::RelativePath;

/// Well-known manifest file name at the root of the published tree
pub const MANIFEST_FILE_NAME: &str = "deploy_manifest.json";

/// JSON representation of a manifest entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonEntry {
    hash: String,
    size: u64,
}

/// JSON-based manifest repository
pub struct JsonManifestRepository {
    path: String,
}

impl JsonManifestRepository {
    /// Repository for the default manifest location
    pub fn new() -> Self {
        Self::at(MANIFEST_FILE_NAME)
    }

    /// Repository for a custom manifest path (relative to the target root)
    pub fn at(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Decode a manifest document
    pub fn decode(content: &[u8]) -> Result<StateMapping, String> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err("empty document".to_string());
        }

        let parsed: BTreeMap<String, JsonEntry> =
            serde_json::from_slice(content).map_err(|e| e.to_string())?;

        parsed
            .into_iter()
            .map(|(key, entry)| {
                let path = RelativePath::parse(&key).map_err(|e| format!("{}: {}", key, e))?;
                Ok(FileRecord {
                    path,
                    fingerprint: Fingerprint::new(entry.hash, entry.size),
                })
            })
            .collect()
    }

    /// Encode a state mapping as a manifest document
    pub fn encode(state: &StateMapping) -> Result<Vec<u8>, serde_json::Error> {
        let doc: BTreeMap<&str, JsonEntry> = state
            .iter()
            .map(|(path, fp)| {
                (
                    path.as_str(),
                    JsonEntry {
                        hash: fp.hash().to_string(),
                        size: fp.size(),
                    },
                )
            })
            .collect();

        let mut out = serde_json::to_vec_pretty(&doc)?;
        out.push(b'\n');
        Ok(out)
    }
}

impl Default for JsonManifestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestRepository for JsonManifestRepository {
    fn path(&self) -> &str {
        &self.path
    }

    fn load(&self, backend: &dyn RemoteBackend) -> Result<ManifestLoad, BackendError> {
        let content = match backend.read_blob(&self.path) {
            Ok(content) => content,
            Err(e @ BackendError::Connection(_)) => return Err(e),
            Err(e) if e.is_not_found() => return Ok(ManifestLoad::empty(ManifestStatus::Missing)),
            Err(e) => return Ok(ManifestLoad::empty(ManifestStatus::Unreadable(e.to_string()))),
        };

        Ok(match Self::decode(&content) {
            Ok(state) => ManifestLoad {
                state,
                status: ManifestStatus::Loaded,
            },
            Err(msg) => ManifestLoad::empty(ManifestStatus::Corrupt(msg)),
        })
    }

    fn save(&self, backend: &dyn RemoteBackend, state: &StateMapping) -> Result<(), BackendError> {
        let content =
            Self::encode(state).map_err(|e| BackendError::Io(std::io::Error::other(e)))?;
        backend.write_blob(&self.path, &content)
    }
}
