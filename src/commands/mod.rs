//! Command handlers
//!
//! Each handler loads what it needs, runs one use case and renders the
//! outcome. Errors propagate to `main`, which reports them once.

mod deploy;
mod pack;
mod version;

pub use deploy::cmd_deploy;
pub use pack::cmd_pack;
pub use version::cmd_version;
