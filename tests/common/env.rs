//! Isolated test environment for running the packdeploy binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Variables that would leak the developer's own configuration into a test
const SCRUBBED_ENV: &[&str] = &[
    "SFTP_HOST",
    "SFTP_USER",
    "SFTP_PASS",
    "SFTP_PORT",
    "TARGET_DIR",
    "FORCE_FULL",
    "DEPLOY_BACKEND",
    "DEPLOY_LOCAL_DIR",
    "DEPLOY_ALLOW_EMPTY",
];

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_events(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("invalid JSON line {:?}: {}", line, e))
            })
            .collect()
    }

    /// Names of the emitted events, in order
    pub fn event_names(&self) -> Vec<String> {
        self.json_events()
            .iter()
            .map(|e| e["event"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

/// Project, deploy target and home directories, all temporary
pub struct TestEnv {
    pub project_root: TempDir,
    pub target_root: TempDir,
    pub home_dir: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("project tempdir"),
            target_root: tempfile::tempdir().expect("target tempdir"),
            home_dir: tempfile::tempdir().expect("home tempdir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_packdeploy")),
        }
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn target_path(&self, relative: &str) -> PathBuf {
        self.target_root.path().join(relative)
    }

    /// Write a file under the default deploy source, `build/server`
    pub fn write_build_file(&self, relative: &str, content: &str) {
        self.write_project_file(&format!("build/server/{}", relative), content);
    }

    pub fn remove_build_file(&self, relative: &str) {
        fs::remove_file(self.project_path(&format!("build/server/{}", relative)))
            .expect("remove build file");
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content);
    }

    pub fn write_target_file(&self, relative: &str, content: &str) {
        write_file(&self.target_path(relative), content);
    }

    pub fn read_target_file(&self, relative: &str) -> String {
        fs::read_to_string(self.target_path(relative))
            .unwrap_or_else(|e| panic!("failed to read target file {}: {}", relative, e))
    }

    /// The manifest stored on the target
    pub fn manifest(&self) -> Value {
        serde_json::from_str(&self.read_target_file("deploy_manifest.json"))
            .expect("manifest is valid JSON")
    }

    /// Run the CLI from the project root with a scrubbed environment
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("PACKDEPLOY_ASCII", "1");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        to_result(cmd.output().expect("failed to execute packdeploy"))
    }

    /// Run `deploy` against the target directory through the local backend
    pub fn deploy(&self, extra_args: &[&str]) -> TestResult {
        let target = self.target_root.path().to_string_lossy().to_string();
        let mut args = vec!["deploy"];
        args.extend_from_slice(extra_args);
        self.run_with_env(
            &args,
            &[("DEPLOY_BACKEND", "local"), ("TARGET_DIR", target.as_str())],
        )
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create directories");
    }
    fs::write(path, content).expect("failed to write file");
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
