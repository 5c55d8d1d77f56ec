//! Relative Path Value Object
//!
//! Keys of a state mapping: forward-slash separated, relative to the
//! published tree root, case-sensitive, never escaping the root.

use std::fmt;
use std::path::{Component, Path};

/// Error when a path cannot be used as a manifest key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelativePathError {
    #[error("path is empty")]
    Empty,
    #[error("absolute paths are not allowed: {0}")]
    Absolute(String),
    #[error("path contains traversal components: {0}")]
    Traversal(String),
}

/// A validated, normalized relative path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Parse a manifest key (already using `/` separators)
    pub fn parse(raw: &str) -> Result<Self, RelativePathError> {
        if raw.is_empty() {
            return Err(RelativePathError::Empty);
        }
        if raw.starts_with('/') || raw.starts_with('\\') || has_drive_prefix(raw) {
            return Err(RelativePathError::Absolute(raw.to_string()));
        }

        let segments: Vec<&str> = raw
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.iter().any(|s| *s == "..") {
            return Err(RelativePathError::Traversal(raw.to_string()));
        }
        if segments.is_empty() {
            return Err(RelativePathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Build from a filesystem path relative to the tree root
    pub fn from_path(path: &Path) -> Result<Self, RelativePathError> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(RelativePathError::Traversal(path.display().to_string()))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(RelativePathError::Absolute(path.display().to_string()))
                }
            }
        }
        if segments.is_empty() {
            return Err(RelativePathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent directory key, `None` for files at the root
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| dir)
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map(|(_, name)| name).unwrap_or(&self.0)
    }
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
