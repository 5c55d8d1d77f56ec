//! Bulk-command backend
//!
//! Drives the remote host through `ssh` shell commands and per-file `rsync`
//! transfers. Deletions are batched into a few `rm -f` invocations, so a
//! failure can only be observed for a whole batch and is fatal.

use std::path::Path;
use std::process::Command;

use super::ssh::{command_error, run_command, shell_quote, SshTarget};
use crate::domain::ports::{BackendError, BackendResult, DeleteOutcome, RemoteBackend};

/// Default number of paths per `rm -f` invocation
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 50;

/// Remote backend built on `ssh` and `rsync` subprocesses
#[derive(Debug)]
pub struct BulkCommandBackend {
    target: SshTarget,
    batch_size: usize,
}

impl BulkCommandBackend {
    /// Open a session: check the tools and probe the connection
    pub fn connect(target: SshTarget, batch_size: usize) -> BackendResult<Self> {
        let backend = Self {
            target,
            batch_size: batch_size.max(1),
        };

        if !Self::rsync_available() {
            return Err(BackendError::NotAvailable(
                "`rsync` is not installed; use the sftp backend instead".to_string(),
            ));
        }

        let output = backend.target.run("true", None)?;
        if !output.status.success() {
            return Err(BackendError::Connection(
                command_error(&format!("ssh {}", backend.target.destination()), &output)
                    .to_string(),
            ));
        }
        Ok(backend)
    }

    /// Check if rsync is installed and available locally
    pub fn rsync_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Remote command removing one batch of paths
    fn delete_command(&self, batch: &[String]) -> String {
        let quoted: Vec<String> = batch
            .iter()
            .map(|p| shell_quote(&self.target.remote_path(p)))
            .collect();
        format!("rm -f {}", quoted.join(" "))
    }

    fn run_checked(&self, what: &str, remote_command: &str, stdin: Option<&[u8]>) -> BackendResult<Vec<u8>> {
        let output = self.target.run(remote_command, stdin)?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(command_error(what, &output))
        }
    }
}

impl RemoteBackend for BulkCommandBackend {
    fn name(&self) -> &'static str {
        "bulk"
    }

    fn describe(&self) -> String {
        self.target.describe()
    }

    fn read_blob(&self, path: &str) -> BackendResult<Vec<u8>> {
        let remote = self.target.remote_path(path);
        self.run_checked(
            &format!("read {}", remote),
            &format!("cat {}", shell_quote(&remote)),
            None,
        )
    }

    fn write_blob(&self, path: &str, content: &[u8]) -> BackendResult<()> {
        let remote = self.target.remote_path(path);
        let parent = match remote.rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => dir.to_string(),
            Some(_) => "/".to_string(),
            None => ".".to_string(),
        };
        let tmp = format!("{}.tmp", remote);
        let command = format!(
            "mkdir -p {} && cat > {} && mv -f {} {}",
            shell_quote(&parent),
            shell_quote(&tmp),
            shell_quote(&tmp),
            shell_quote(&remote)
        );
        self.run_checked(&format!("write {}", remote), &command, Some(content))
            .map(|_| ())
    }

    fn ensure_directory(&self, path: &str) -> BackendResult<()> {
        let remote = self.target.remote_path(path);
        self.run_checked(
            &format!("mkdir {}", remote),
            &format!("mkdir -p {}", shell_quote(&remote)),
            None,
        )
        .map(|_| ())
    }

    fn upload(
        &self,
        local: &Path,
        remote: &str,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> BackendResult<()> {
        let total = std::fs::metadata(local)?.len();
        on_progress(0, total);

        let remote_path = self.target.remote_path(remote);
        let output = run_command(self.target.rsync_command(local, &remote_path), None)?;
        if !output.status.success() {
            return Err(command_error(&format!("rsync {}", remote), &output));
        }

        on_progress(total, total);
        Ok(())
    }

    fn delete_one(&self, path: &str) -> BackendResult<()> {
        let remote = self.target.remote_path(path);
        self.run_checked(
            &format!("delete {}", remote),
            &format!("rm -f {}", shell_quote(&remote)),
            None,
        )
        .map(|_| ())
    }

    /// Batched deletion; a failed batch aborts the whole operation
    fn delete_many(&self, paths: &[String]) -> BackendResult<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();
        for (index, batch) in paths.chunks(self.batch_size).enumerate() {
            outcome.batches += 1;
            self.run_checked(
                &format!("delete batch {} ({} paths)", index + 1, batch.len()),
                &self.delete_command(batch),
                None,
            )?;
            outcome.deleted.extend(batch.iter().cloned());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendKind, RemoteConfig};

    fn backend(batch_size: usize) -> BulkCommandBackend {
        let remote = RemoteConfig {
            host: "host".to_string(),
            user: "user".to_string(),
            password: None,
            port: 22,
            target_dir: "/srv/game".to_string(),
            backend: BackendKind::Bulk,
            connect_timeout_secs: 5,
            lossy_transport: false,
            delete_batch_size: batch_size,
        };
        // Constructed directly: these tests never spawn processes.
        BulkCommandBackend {
            target: SshTarget::from_config(&remote),
            batch_size,
        }
    }

    #[test]
    fn delete_command_quotes_every_path() {
        let backend = backend(50);
        let cmd = backend.delete_command(&["a b.txt".to_string(), "it's/c".to_string()]);
        assert_eq!(cmd, "rm -f '/srv/game/a b.txt' '/srv/game/it'\\''s/c'");
    }

    #[test]
    fn describe_names_target() {
        assert_eq!(backend(50).describe(), "user@host:22:/srv/game");
        assert_eq!(backend(50).name(), "bulk");
    }

    #[test]
    fn empty_delete_issues_no_batches() {
        let outcome = backend(50).delete_many(&[]).unwrap();
        assert_eq!(outcome, DeleteOutcome::default());
    }

    #[test]
    fn rsync_available_does_not_panic() {
        let _ = BulkCommandBackend::rsync_available();
    }
}
