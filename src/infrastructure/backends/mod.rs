//! Remote Backends
//!
//! Implementations of the `RemoteBackend` port, and the connector that picks
//! one from configuration.

mod bulk;
mod local;
mod sftp;
mod ssh;

pub use bulk::{BulkCommandBackend, DEFAULT_DELETE_BATCH_SIZE};
pub use local::LocalDirBackend;
pub use sftp::SftpBackend;
pub use ssh::{shell_quote, SshTarget};

use crate::config::{BackendKind, RemoteConfig};
use crate::domain::ports::{BackendConnector, BackendResult, RemoteBackend};

/// Connector that opens the backend selected in the configuration
#[derive(Debug, Clone)]
pub struct ConfiguredConnector {
    remote: RemoteConfig,
}

impl ConfiguredConnector {
    pub fn new(remote: RemoteConfig) -> Self {
        Self { remote }
    }

    pub fn kind(&self) -> BackendKind {
        self.remote.backend
    }
}

impl BackendConnector for ConfiguredConnector {
    fn backend_name(&self) -> &'static str {
        self.remote.backend.as_str()
    }

    fn target(&self) -> String {
        match self.remote.backend {
            BackendKind::Local => self.remote.target_dir.clone(),
            BackendKind::Bulk | BackendKind::Sftp => {
                SshTarget::from_config(&self.remote).describe()
            }
        }
    }

    fn connect(&self) -> BackendResult<Box<dyn RemoteBackend>> {
        let backend: Box<dyn RemoteBackend> = match self.remote.backend {
            BackendKind::Bulk => Box::new(BulkCommandBackend::connect(
                SshTarget::from_config(&self.remote),
                self.remote.delete_batch_size,
            )?),
            BackendKind::Sftp => Box::new(SftpBackend::connect(&self.remote)?),
            BackendKind::Local => Box::new(LocalDirBackend::connect(&self.remote.target_dir)?),
        };
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn remote(kind: BackendKind, target_dir: &str) -> RemoteConfig {
        RemoteConfig {
            host: "host".to_string(),
            user: "user".to_string(),
            password: Some("secret".to_string()),
            port: 22,
            target_dir: target_dir.to_string(),
            backend: kind,
            connect_timeout_secs: 5,
            lossy_transport: false,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
        }
    }

    #[test]
    fn local_connector_opens_directory() {
        let dir = tempdir().unwrap();
        let connector =
            ConfiguredConnector::new(remote(BackendKind::Local, &dir.path().to_string_lossy()));

        let backend = connector.connect().unwrap();

        assert_eq!(backend.name(), "local");
        assert_eq!(connector.kind(), BackendKind::Local);
    }

    #[test]
    fn remote_target_never_contains_password() {
        let connector = ConfiguredConnector::new(remote(BackendKind::Sftp, "/srv"));
        let target = connector.target();

        assert!(target.contains("user@host"));
        assert!(!target.contains("secret"));
    }
}
