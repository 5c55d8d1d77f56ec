//! packdeploy - modpack packager and manifest-driven incremental deployer
//!
//! `pack` builds client and server trees from a project; `deploy` publishes
//! a local build tree to a remote target, uploading only changed files and
//! deleting files a previous run created that are gone locally. A JSON
//! manifest stored on the target records what was deployed.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod ui;

pub use application::{DeployOptions, DeployReport, DeployUseCase, PackOptions, PackUseCase};
pub use config::{BackendKind, DeployConfig};
pub use error::{DeployError, DeployResult};
