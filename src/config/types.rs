//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::loader::{self, ConfigWarning};

/// Configuration errors, reported before any I/O against the target
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required settings are absent; all of them are listed at once
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("failed to parse {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    #[error("failed to read {}: {source}", file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which remote operation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// ssh/rsync subprocesses
    #[default]
    Bulk,
    /// Direct SFTP session
    Sftp,
    /// Local or mounted directory
    Local,
}

impl BackendKind {
    pub const NAMES: &'static [&'static str] = &["bulk", "sftp", "local"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Bulk => "bulk",
            BackendKind::Sftp => "sftp",
            BackendKind::Local => "local",
        }
    }

    /// Whether the backend talks to a host over the network
    pub fn is_remote(&self) -> bool {
        !matches!(self, BackendKind::Local)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bulk" | "rsync" => Ok(BackendKind::Bulk),
            "sftp" => Ok(BackendKind::Sftp),
            "local" => Ok(BackendKind::Local),
            other => Err(format!(
                "unknown backend '{}' (expected one of: {})",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Connection settings for the deploy target
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub port: u16,
    /// Remote base directory (or local directory for the `local` backend)
    pub target_dir: String,
    pub backend: BackendKind,
    pub connect_timeout_secs: u64,
    /// Tune the transport for slow or lossy links
    pub lossy_transport: bool,
    pub delete_batch_size: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: None,
            port: 22,
            target_dir: String::new(),
            backend: BackendKind::default(),
            connect_timeout_secs: 15,
            lossy_transport: false,
            delete_batch_size: 50,
        }
    }
}

// Manual Debug so the password never reaches logs.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("target_dir", &self.target_dir)
            .field("backend", &self.backend)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("lossy_transport", &self.lossy_transport)
            .field("delete_batch_size", &self.delete_batch_size)
            .finish()
    }
}

/// Local side of a deploy run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub local_dir: PathBuf,
    pub force_full: bool,
    /// Let an empty local tree delete everything the manifest records
    pub allow_empty: bool,
    pub progress_interval_secs: u64,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from("build/server"),
            force_full: false,
            allow_empty: false,
            progress_interval_secs: 5,
        }
    }
}

/// Complete deploy configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub remote: RemoteConfig,
    pub deploy: DeploySettings,
}

impl DeployConfig {
    /// Load a TOML file, collecting unknown-key warnings
    pub fn load(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.deploy.progress_interval_secs)
    }

    /// Check that every setting the chosen backend needs is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        let remote = &self.remote;
        let mut missing = Vec::new();

        if remote.backend.is_remote() {
            if remote.host.trim().is_empty() {
                missing.push("SFTP_HOST".to_string());
            }
            if remote.user.trim().is_empty() {
                missing.push("SFTP_USER".to_string());
            }
        }
        if remote.backend == BackendKind::Sftp
            && remote.password.as_deref().is_none_or(str::is_empty)
        {
            missing.push("SFTP_PASS".to_string());
        }
        if remote.target_dir.trim().is_empty() {
            missing.push("TARGET_DIR".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        if remote.backend.is_remote() && remote.port == 0 {
            return Err(ConfigError::Invalid {
                key: "port".to_string(),
                message: "must be between 1 and 65535".to_string(),
            });
        }
        if remote.delete_batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "delete_batch_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if remote.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "connect_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
