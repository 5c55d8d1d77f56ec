//! SSH command construction
//!
//! Shared by the bulk-command backend: builds `ssh` and `rsync` invocations
//! for one target, with optional `sshpass` wrapping for password logins.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use crate::config::RemoteConfig;
use crate::domain::ports::BackendError;

/// Keepalive settings used when the transport drops packets
const LOSSY_KEEPALIVE: [&str; 4] = [
    "-o",
    "ServerAliveInterval=15",
    "-o",
    "ServerAliveCountMax=4",
];

/// Exit status `ssh` reserves for its own failures
const SSH_FAILURE_STATUS: i32 = 255;

/// Connection parameters for one SSH target
#[derive(Clone)]
pub struct SshTarget {
    host: String,
    user: String,
    port: u16,
    password: Option<String>,
    base_dir: String,
    connect_timeout: Duration,
    lossy: bool,
}

impl std::fmt::Debug for SshTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshTarget")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

impl SshTarget {
    pub fn from_config(remote: &RemoteConfig) -> Self {
        Self {
            host: remote.host.clone(),
            user: remote.user.clone(),
            port: remote.port,
            password: remote.password.clone().filter(|p| !p.is_empty()),
            base_dir: remote.target_dir.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(remote.connect_timeout_secs),
            lossy: remote.lossy_transport,
        }
    }

    /// `user@host`, or just `host` when no user is configured
    pub fn destination(&self) -> String {
        if self.user.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }

    /// Target description for reports; contains no credentials
    pub fn describe(&self) -> String {
        format!("{}:{}:{}", self.destination(), self.port, self.base_dir)
    }

    /// Remote path of an entry below the base directory
    ///
    /// The empty path is the base directory itself.
    pub fn remote_path(&self, rel: &str) -> String {
        let rel = rel.trim_matches('/');
        match (self.base_dir.is_empty(), rel.is_empty()) {
            (true, true) => ".".to_string(),
            (true, false) => rel.to_string(),
            (false, true) => self.base_dir.clone(),
            (false, false) => format!("{}/{}", self.base_dir, rel),
        }
    }

    /// Options shared by `ssh` and rsync's remote shell
    pub fn ssh_options(&self) -> Vec<String> {
        let mut opts = vec![
            "-p".to_string(),
            self.port.to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
        ];
        if self.password.is_none() {
            opts.push("-o".to_string());
            opts.push("BatchMode=yes".to_string());
        }
        if self.lossy {
            opts.extend(LOSSY_KEEPALIVE.iter().map(|s| s.to_string()));
        }
        opts
    }

    /// Program invocation, wrapped in `sshpass -e` when a password is set
    fn program(&self, program: &str) -> Command {
        match &self.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.arg("-e").arg(program).env("SSHPASS", password);
                cmd
            }
            None => Command::new(program),
        }
    }

    /// `ssh` invocation running `remote_command` on the target
    pub fn ssh_command(&self, remote_command: &str) -> Command {
        let mut cmd = self.program("ssh");
        cmd.args(self.ssh_options())
            .arg(self.destination())
            .arg(remote_command);
        cmd
    }

    /// `rsync` invocation copying one local file to `remote`
    pub fn rsync_command(&self, local: &Path, remote: &str) -> Command {
        let shell = std::iter::once("ssh".to_string())
            .chain(self.ssh_options())
            .collect::<Vec<_>>()
            .join(" ");

        let mut cmd = self.program("rsync");
        // Planned uploads always transfer; skip rsync's size+mtime quick check.
        cmd.arg("-z")
            .arg("--ignore-times")
            .arg("--no-perms")
            .arg("--timeout=60")
            .arg("--protect-args")
            .arg("-e")
            .arg(shell)
            .arg(local)
            .arg(format!("{}:{}", self.destination(), rsync_path(remote)));
        cmd
    }

    /// Run `remote_command`, optionally feeding `stdin`
    pub fn run(&self, remote_command: &str, stdin: Option<&[u8]>) -> Result<Output, BackendError> {
        run_command(self.ssh_command(remote_command), stdin)
    }
}

/// Run a prepared command to completion, capturing its output
pub fn run_command(mut cmd: Command, stdin: Option<&[u8]>) -> Result<Output, BackendError> {
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let program = cmd.get_program().to_string_lossy().to_string();
    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BackendError::NotAvailable(format!("`{}` is not installed", program))
        } else {
            BackendError::Io(e)
        }
    })?;

    if let (Some(content), Some(mut pipe)) = (stdin, child.stdin.take()) {
        use std::io::Write;
        pipe.write_all(content)?;
    }

    Ok(child.wait_with_output()?)
}

/// Turn a failed command's output into an error
///
/// `ssh` exits with 255 for its own failures, which are connection errors.
pub fn command_error(what: &str, output: &Output) -> BackendError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        format!("{} exited with {:?}", what, output.status.code())
    } else {
        format!("{}: {}", what, stderr)
    };

    if output.status.code() == Some(SSH_FAILURE_STATUS) {
        BackendError::Connection(detail)
    } else if stderr.contains("No such file") {
        BackendError::NotFound(detail)
    } else {
        BackendError::CommandFailed(detail)
    }
}

/// Quote a string for a POSIX shell
///
/// A leading `~/` is left outside the quotes so the remote shell expands it.
pub fn shell_quote(s: &str) -> String {
    match s.strip_prefix("~/") {
        Some(rest) => format!("~/{}", quote_literal(rest)),
        None if s == "~" => "~".to_string(),
        None => quote_literal(s),
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// rsync resolves relative remote paths against the login directory
fn rsync_path(remote: &str) -> &str {
    match remote.strip_prefix("~/") {
        Some(rest) => rest,
        None if remote == "~" => ".",
        None => remote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    fn remote(password: Option<&str>, lossy: bool) -> RemoteConfig {
        RemoteConfig {
            host: "mc.example.net".to_string(),
            user: "deploy".to_string(),
            password: password.map(str::to_string),
            port: 2222,
            target_dir: "/srv/minecraft/".to_string(),
            backend: BackendKind::Bulk,
            connect_timeout_secs: 15,
            lossy_transport: lossy,
            delete_batch_size: 50,
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("simple"), "'simple'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote("a b/c d"), "'a b/c d'");
    }

    #[test]
    fn shell_quote_keeps_home_expansion() {
        assert_eq!(shell_quote("~/server/mods"), "~/'server/mods'");
        assert_eq!(shell_quote("~"), "~");
    }

    #[test]
    fn remote_path_joins_base() {
        let target = SshTarget::from_config(&remote(None, false));
        assert_eq!(target.remote_path(""), "/srv/minecraft");
        assert_eq!(target.remote_path("mods/a.jar"), "/srv/minecraft/mods/a.jar");
    }

    #[test]
    fn ssh_command_without_password_uses_batch_mode() {
        let target = SshTarget::from_config(&remote(None, false));
        let cmd = target.ssh_command("true");

        assert_eq!(cmd.get_program(), "ssh");
        let args = args(&cmd);
        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert!(args.contains(&"2222".to_string()));
        assert_eq!(args[args.len() - 2], "deploy@mc.example.net");
        assert_eq!(args[args.len() - 1], "true");
    }

    #[test]
    fn ssh_command_with_password_wraps_sshpass() {
        let target = SshTarget::from_config(&remote(Some("hunter2"), false));
        let cmd = target.ssh_command("true");

        assert_eq!(cmd.get_program(), "sshpass");
        let args = args(&cmd);
        assert_eq!(&args[..2], &["-e".to_string(), "ssh".to_string()]);
        assert!(!args.iter().any(|a| a.contains("hunter2")));
        assert!(cmd
            .get_envs()
            .any(|(k, v)| k == "SSHPASS" && v.is_some_and(|v| v == "hunter2")));
    }

    #[test]
    fn lossy_transport_adds_keepalives() {
        let plain = SshTarget::from_config(&remote(None, false)).ssh_options();
        let lossy = SshTarget::from_config(&remote(None, true)).ssh_options();

        assert!(!plain.iter().any(|o| o.starts_with("ServerAlive")));
        assert!(lossy.contains(&"ServerAliveInterval=15".to_string()));
        assert!(lossy.contains(&"ServerAliveCountMax=4".to_string()));
    }

    #[test]
    fn rsync_command_targets_one_file() {
        let target = SshTarget::from_config(&remote(None, false));
        let cmd = target.rsync_command(Path::new("build/server/a.jar"), "/srv/minecraft/a.jar");

        assert_eq!(cmd.get_program(), "rsync");
        let args = args(&cmd);
        assert!(args.contains(&"--no-perms".to_string()));
        assert!(args.contains(&"--timeout=60".to_string()));
        assert!(args.contains(&"--ignore-times".to_string()));
        let shell = &args[args.iter().position(|a| a == "-e").unwrap() + 1];
        assert!(shell.starts_with("ssh -p 2222"));
        assert_eq!(args.last().unwrap(), "deploy@mc.example.net:/srv/minecraft/a.jar");
    }

    #[test]
    fn rsync_path_strips_home_prefix() {
        assert_eq!(rsync_path("~/srv/a"), "srv/a");
        assert_eq!(rsync_path("/abs"), "/abs");
    }

    #[test]
    fn debug_redacts_password() {
        let target = SshTarget::from_config(&remote(Some("hunter2"), false));
        let dbg = format!("{:?}", target);
        assert!(!dbg.contains("hunter2"));
        assert!(!target.describe().contains("hunter2"));
    }
}
