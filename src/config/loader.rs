//! Configuration loading
//!
//! Precedence, lowest first: defaults, TOML file, environment, CLI flags.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{BackendKind, ConfigError, DeployConfig};

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "packdeploy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Settings given on the command line; `None` leaves the lower layer alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<BackendKind>,
    pub local_dir: Option<PathBuf>,
    pub force_full: bool,
    pub allow_empty: bool,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(DeployConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(&content, path)
}

fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(DeployConfig, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: DeployConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the config file: explicit path, project file, then user config dir
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }

    dirs::config_dir()
        .map(|dir| dir.join("packdeploy").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Build the effective configuration from every layer.
///
/// Warnings (unknown keys, unparseable environment values) are written to
/// `warnings`; the caller decides whether they reach the terminal.
pub fn load_layered<W: Write>(
    explicit: Option<&Path>,
    cwd: &Path,
    overrides: &ConfigOverrides,
    warnings: &mut W,
) -> Result<DeployConfig, ConfigError> {
    let mut config = match resolve_config_path(explicit, cwd) {
        Some(path) => {
            let (config, file_warnings) = load_with_warnings(&path)?;
            for warning in file_warnings {
                let _ = writeln!(warnings, "Warning: {}", warning);
            }
            config
        }
        None => DeployConfig::default(),
    };

    apply_env(&mut config, |name| std::env::var(name).ok(), warnings)?;
    apply_overrides(&mut config, overrides);
    Ok(config)
}

/// Apply environment variables read through `lookup`
pub fn apply_env<F, W>(config: &mut DeployConfig, lookup: F, warnings: &mut W) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = present("SFTP_HOST") {
        config.remote.host = host;
    }
    if let Some(user) = present("SFTP_USER") {
        config.remote.user = user;
    }
    if let Some(password) = lookup("SFTP_PASS").filter(|v| !v.is_empty()) {
        config.remote.password = Some(password);
    }
    if let Some(port) = present("SFTP_PORT") {
        config.remote.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "SFTP_PORT".to_string(),
            message: format!("'{}' is not a port number", port),
        })?;
    }
    if let Some(dir) = present("TARGET_DIR") {
        config.remote.target_dir = dir;
    }
    if let Some(dir) = present("DEPLOY_LOCAL_DIR") {
        config.deploy.local_dir = PathBuf::from(dir);
    }
    if let Some(value) = present("DEPLOY_BACKEND") {
        let current = config.remote.backend;
        config.remote.backend = EnvVarValidator::new("DEPLOY_BACKEND", BackendKind::NAMES)
            .parse_with_writer(&value, |s| s.parse().ok(), current, warnings);
    }
    if let Some(value) = present("FORCE_FULL") {
        let current = config.deploy.force_full;
        config.deploy.force_full = EnvVarValidator::new("FORCE_FULL", &["true", "false"])
            .parse_with_writer(&value, parse_bool, current, warnings);
    }
    if let Some(value) = present("DEPLOY_ALLOW_EMPTY") {
        let current = config.deploy.allow_empty;
        config.deploy.allow_empty = EnvVarValidator::new("DEPLOY_ALLOW_EMPTY", &["true", "false"])
            .parse_with_writer(&value, parse_bool, current, warnings);
    }
    Ok(())
}

/// Apply CLI flags, the highest-precedence layer
pub fn apply_overrides(config: &mut DeployConfig, overrides: &ConfigOverrides) {
    if let Some(backend) = overrides.backend {
        config.remote.backend = backend;
    }
    if let Some(dir) = &overrides.local_dir {
        config.deploy.local_dir = dir.clone();
    }
    if overrides.force_full {
        config.deploy.force_full = true;
    }
    if overrides.allow_empty {
        config.deploy.allow_empty = true;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "remote",
        "deploy",
        "host",
        "user",
        "password",
        "port",
        "target_dir",
        "backend",
        "connect_timeout_secs",
        "lossy_transport",
        "delete_batch_size",
        "local_dir",
        "force_full",
        "allow_empty",
        "progress_interval_secs",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
