//! Pack Result

use std::path::PathBuf;

use super::options::PackMode;

/// Outcome of building one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackBuild {
    pub mode: PackMode,
    pub output: PathBuf,
    /// Whether a previous output directory was removed first
    pub cleaned: bool,
    /// Files copied from the project tree
    pub copied: usize,
    /// Files copied from the server overlay
    pub overlaid: usize,
    /// Number of exclusion patterns in effect
    pub patterns: usize,
}

/// Outcome of a pack run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    pub builds: Vec<PackBuild>,
    /// Non-fatal problems (ignored options, missing overlay)
    pub warnings: Vec<String>,
}

impl PackReport {
    pub fn total_files(&self) -> usize {
        self.builds.iter().map(|b| b.copied + b.overlaid).sum()
    }
}
