//! Configuration module
//!
//! Configuration hierarchy, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, `./packdeploy.toml`, or the user config dir)
//! 3. Environment variables (`SFTP_*`, `TARGET_DIR`, `DEPLOY_*`, `FORCE_FULL`)
//! 4. CLI flags
//!
//! The result is validated once and passed into construction; nothing below
//! the presentation layer reads the environment.

mod env_validator;
mod loader;
mod types;

pub use loader::{
    apply_env, apply_overrides, load_layered, load_with_warnings, resolve_config_path,
    ConfigOverrides, ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{BackendKind, ConfigError, DeployConfig, DeploySettings, RemoteConfig};
