//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Reconciles a remote target with a local build tree
//! - `PackUseCase` - Builds client and server trees from a project

pub mod deploy;
pub mod pack;

pub use deploy::{DeployOptions, DeployReport, DeployUseCase};
pub use pack::{PackBuild, PackMode, PackOptions, PackReport, PackUseCase};
