//! SFTP backend
//!
//! Talks SFTP over an in-process SSH session (`russh` + `russh-sftp`).
//! The client is async; each blocking trait call is driven to completion
//! on a private current-thread runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{AuthResult, Handle, Handler};
use russh_sftp::client::error::Error as SftpError;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::Runtime;

use crate::config::RemoteConfig;
use crate::domain::ports::{BackendError, BackendResult, RemoteBackend};

/// Upload chunk size; also the progress callback granularity
const UPLOAD_CHUNK: usize = 32 * 1024;

/// Accepts any server host key
///
/// Matches `StrictHostKeyChecking=accept-new` on a fresh machine; targets
/// are configured explicitly by the operator.
struct HostKeyAcceptor;

impl Handler for HostKeyAcceptor {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Remote backend speaking SFTP directly
pub struct SftpBackend {
    sftp: SftpSession,
    // Keeps the SSH connection open for the lifetime of the backend
    _session: Handle<HostKeyAcceptor>,
    base_dir: String,
    target: String,
    runtime: Runtime,
}

impl SftpBackend {
    /// Connect, authenticate with the configured password and open SFTP
    pub fn connect(remote: &RemoteConfig) -> BackendResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let config = Arc::new(client_config(remote.lossy_transport));
        let timeout = Duration::from_secs(remote.connect_timeout_secs.max(1));
        let host = remote.host.clone();
        let port = remote.port;
        let user = remote.user.clone();
        let password = remote.password.clone().unwrap_or_default();

        let (session, sftp) = runtime.block_on(async move {
            let opened = tokio::time::timeout(timeout, async {
                let mut session =
                    russh::client::connect(config, (host.as_str(), port), HostKeyAcceptor)
                        .await
                        .map_err(|e| BackendError::Connection(e.to_string()))?;

                let auth = session
                    .authenticate_password(user.as_str(), password.as_str())
                    .await
                    .map_err(|e| BackendError::Connection(e.to_string()))?;
                if let AuthResult::Failure { .. } = auth {
                    return Err(BackendError::Connection(format!(
                        "authentication failed for user '{}'",
                        user
                    )));
                }

                let channel = session
                    .channel_open_session()
                    .await
                    .map_err(|e| BackendError::Connection(e.to_string()))?;
                channel
                    .request_subsystem(true, "sftp")
                    .await
                    .map_err(|e| BackendError::Connection(e.to_string()))?;
                let sftp = SftpSession::new(channel.into_stream())
                    .await
                    .map_err(|e| BackendError::Connection(e.to_string()))?;

                Ok::<_, BackendError>((session, sftp))
            })
            .await;

            match opened {
                Ok(result) => result,
                Err(_) => Err(BackendError::Connection(format!(
                    "timed out after {}s",
                    timeout.as_secs()
                ))),
            }
        })?;

        Ok(Self {
            sftp,
            _session: session,
            base_dir: sftp_base_dir(&remote.target_dir),
            target: format!(
                "sftp://{}@{}:{}/{}",
                remote.user,
                remote.host,
                remote.port,
                remote.target_dir.trim_start_matches('/')
            ),
            runtime,
        })
    }

    fn remote_path(&self, rel: &str) -> String {
        join_remote(&self.base_dir, rel)
    }
}

impl RemoteBackend for SftpBackend {
    fn name(&self) -> &'static str {
        "sftp"
    }

    fn describe(&self) -> String {
        self.target.clone()
    }

    fn read_blob(&self, path: &str) -> BackendResult<Vec<u8>> {
        let remote = self.remote_path(path);
        self.runtime.block_on(async {
            let mut file = self
                .sftp
                .open(remote.as_str())
                .await
                .map_err(|e| sftp_error(&remote, e))?;
            let mut content = Vec::new();
            file.read_to_end(&mut content).await?;
            Ok::<_, BackendError>(content)
        })
    }

    fn write_blob(&self, path: &str, content: &[u8]) -> BackendResult<()> {
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.ensure_directory(parent)?;
        }
        let remote = self.remote_path(path);
        self.runtime.block_on(async {
            let mut file = self
                .sftp
                .create(remote.as_str())
                .await
                .map_err(|e| sftp_error(&remote, e))?;
            file.write_all(content).await?;
            file.shutdown().await?;
            Ok::<_, BackendError>(())
        })
    }

    fn ensure_directory(&self, path: &str) -> BackendResult<()> {
        let remote = self.remote_path(path);
        self.runtime
            .block_on(create_dir_all(&self.sftp, &remote))
            .map_err(|e| sftp_error(&remote, e))
    }

    fn upload(
        &self,
        local: &Path,
        remote: &str,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> BackendResult<()> {
        let remote_path = self.remote_path(remote);
        self.runtime.block_on(async {
            let mut reader = tokio::fs::File::open(local).await?;
            let total = reader.metadata().await?.len();
            let mut file = self
                .sftp
                .create(remote_path.as_str())
                .await
                .map_err(|e| sftp_error(&remote_path, e))?;

            on_progress(0, total);
            let mut buf = vec![0u8; UPLOAD_CHUNK];
            let mut done = 0u64;
            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                file.write_all(&buf[..n])
                    .await
                    .map_err(|e| BackendError::Remote(format!("{}: {}", remote_path, e)))?;
                done += n as u64;
                on_progress(done, total);
            }
            file.shutdown()
                .await
                .map_err(|e| BackendError::Remote(format!("{}: {}", remote_path, e)))?;
            Ok::<_, BackendError>(())
        })
    }

    fn delete_one(&self, path: &str) -> BackendResult<()> {
        let remote = self.remote_path(path);
        self.runtime
            .block_on(self.sftp.remove_file(remote.as_str()))
            .map_err(|e| sftp_error(&remote, e))
    }
}

/// SSH client configuration, tuned for lossy links when asked
fn client_config(lossy: bool) -> russh::client::Config {
    if lossy {
        russh::client::Config {
            window_size: 262_144,
            maximum_packet_size: 16_384,
            keepalive_interval: Some(Duration::from_secs(15)),
            keepalive_max: 4,
            ..Default::default()
        }
    } else {
        russh::client::Config::default()
    }
}

/// SFTP paths are relative to the login directory unless absolute
fn sftp_base_dir(target_dir: &str) -> String {
    let dir = target_dir.trim_end_matches('/');
    match dir.strip_prefix("~/") {
        Some(rest) => rest.to_string(),
        None if dir == "~" => String::new(),
        None => dir.to_string(),
    }
}

fn join_remote(base: &str, rel: &str) -> String {
    let rel = rel.trim_matches('/');
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => rel.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rel),
    }
}

fn sftp_error(path: &str, err: SftpError) -> BackendError {
    match err {
        SftpError::Status(status) if status.status_code == StatusCode::NoSuchFile => {
            BackendError::NotFound(path.to_string())
        }
        SftpError::Status(status) => {
            BackendError::Remote(format!("{}: {}", path, status.error_message))
        }
        other => BackendError::Remote(format!("{}: {}", path, other)),
    }
}

/// Create a directory and its parents, tolerating ones that already exist
async fn create_dir_all(sftp: &SftpSession, path: &str) -> Result<(), SftpError> {
    if path.is_empty() || path == "." || path == "/" {
        return Ok(());
    }
    if let Ok(attrs) = sftp.metadata(path).await {
        if attrs.is_dir() {
            return Ok(());
        }
    }

    let absolute = path.starts_with('/');
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if current.is_empty() {
            if absolute {
                current.push('/');
            }
        } else {
            current.push('/');
        }
        current.push_str(segment);

        if let Err(e) = sftp.create_dir(current.as_str()).await {
            // Servers report an existing directory as a generic failure.
            match sftp.metadata(current.as_str()).await {
                Ok(attrs) if attrs.is_dir() => {}
                _ => return Err(e),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_dir_strips_home_prefix() {
        assert_eq!(sftp_base_dir("~/server/"), "server");
        assert_eq!(sftp_base_dir("~"), "");
        assert_eq!(sftp_base_dir("/srv/game/"), "/srv/game");
    }

    #[test]
    fn join_remote_handles_root_and_nesting() {
        assert_eq!(join_remote("/srv", ""), "/srv");
        assert_eq!(join_remote("/srv", "mods/a.jar"), "/srv/mods/a.jar");
        assert_eq!(join_remote("", "a"), "a");
        assert_eq!(join_remote("", ""), ".");
    }

    #[test]
    fn lossy_config_shrinks_packets() {
        let lossy = client_config(true);
        let plain = client_config(false);
        assert_eq!(lossy.maximum_packet_size, 16_384);
        assert!(lossy.keepalive_interval.is_some());
        assert!(plain.maximum_packet_size >= lossy.maximum_packet_size);
    }

    #[test]
    fn connect_to_unreachable_host_is_connection_error() {
        let remote = RemoteConfig {
            host: "127.0.0.1".to_string(),
            user: "nobody".to_string(),
            password: Some("x".to_string()),
            // Port 1 is reserved and closed on test machines.
            port: 1,
            target_dir: "/tmp".to_string(),
            backend: crate::config::BackendKind::Sftp,
            connect_timeout_secs: 2,
            lossy_transport: false,
            delete_batch_size: 50,
        };

        let err = SftpBackend::connect(&remote).err().unwrap();
        assert!(matches!(err, BackendError::Connection(_)));
    }
}
