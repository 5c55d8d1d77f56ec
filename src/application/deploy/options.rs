//! Deploy Options
//!
//! Configuration types for deploy operations.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::services::DEFAULT_PROGRESS_INTERVAL;

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Local build tree to publish
    pub source: PathBuf,
    /// Re-upload every local file regardless of the manifest
    pub force_full: bool,
    /// Plan only; never touch the remote target
    pub dry_run: bool,
    /// Permit an empty build tree to remove every published file
    pub allow_empty: bool,
    /// Minimum interval between progress reports for one upload
    pub progress_interval: Duration,
}

impl DeployOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            force_full: false,
            dry_run: false,
            allow_empty: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_force_full(mut self, force_full: bool) -> Self {
        self.force_full = force_full;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}
