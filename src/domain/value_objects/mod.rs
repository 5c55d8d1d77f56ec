//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod hash;
mod ignore_patterns;
mod relative_path;

pub use hash::ContentHash;
pub use ignore_patterns::{IgnoreError, IgnorePatterns};
pub use relative_path::{RelativePath, RelativePathError};
