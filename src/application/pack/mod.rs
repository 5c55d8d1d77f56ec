//! Pack Module
//!
//! Builds client and server trees from a modpack project.
//!
//! - `options` - Mode selection and well-known names (`PackOptions`, `PackMode`)
//! - `result` - Per-mode outcome (`PackReport`)
//! - `use_case` - Copy, filter and overlay (`PackUseCase`)

mod options;
mod result;
mod use_case;

pub use options::{
    PackMode, PackOptions, CLIENT_FILES_FILE, DEFAULT_BUILD_DIR, PACK_IGNORE_FILE,
    SERVER_PACK_DIR,
};
pub use result::{PackBuild, PackReport};
pub use use_case::PackUseCase;
