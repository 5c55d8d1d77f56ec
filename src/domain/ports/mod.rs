//! Domain Ports
//!
//! Interfaces the domain depends on; implemented in the infrastructure layer.

pub mod deploy_events;
pub mod manifest_repository;
pub mod remote_backend;

pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use manifest_repository::{ManifestLoad, ManifestRepository, ManifestStatus};
pub use remote_backend::{
    BackendConnector, BackendError, BackendResult, DeleteOutcome, RemoteBackend,
};
