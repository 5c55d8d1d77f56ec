//! Domain Services
//!
//! Stateless services containing business logic that doesn't belong to entities.
//!
//! - `Planner` - Diffs local state against the recorded manifest
//! - `ProgressThrottle` - Rate-limits transfer progress reports

mod planner;
mod progress;

pub use planner::{Planner, SyncPlan, UploadReason};
pub use progress::{ProgressThrottle, DEFAULT_PROGRESS_INTERVAL};
