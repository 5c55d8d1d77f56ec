//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::{DeployOptions, DeployUseCase, PackUseCase};
use crate::config::DeployConfig;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{
    ConfiguredConnector, ConsoleEventSink, JsonEventSink, JsonManifestRepository,
};
use crate::ui::terminal::detect_capabilities;

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<ConfiguredConnector, JsonManifestRepository>;

/// Create a deploy use case for the configured backend
///
/// Nothing connects until the use case runs.
pub fn create_deploy_use_case(config: &DeployConfig) -> ConcreteDeployUseCase {
    let connector = ConfiguredConnector::new(config.remote.clone());
    DeployUseCase::new(connector, JsonManifestRepository::new())
}

pub fn create_pack_use_case() -> PackUseCase {
    PackUseCase::new()
}

/// Deploy options from the effective configuration
pub fn deploy_options(config: &DeployConfig, dry_run: bool) -> DeployOptions {
    DeployOptions::new(config.deploy.local_dir.clone())
        .with_force_full(config.deploy.force_full)
        .with_dry_run(dry_run)
        .with_allow_empty(config.deploy.allow_empty)
        .with_progress_interval(config.progress_interval())
}

/// Event sink for the requested output mode
pub fn create_event_sink(json: bool, verbose: u8) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        let caps = detect_capabilities();
        Arc::new(ConsoleEventSink::stderr(caps.supports_unicode, verbose > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use crate::domain::ports::BackendConnector;
    use std::time::Duration;

    #[test]
    fn options_follow_config() {
        let mut config = DeployConfig::default();
        config.deploy.force_full = true;
        config.deploy.allow_empty = true;
        config.deploy.progress_interval_secs = 2;

        let options = deploy_options(&config, true);

        assert_eq!(options.source, config.deploy.local_dir);
        assert!(options.force_full);
        assert!(options.dry_run);
        assert!(options.allow_empty);
        assert_eq!(options.progress_interval, Duration::from_secs(2));
    }

    #[test]
    fn use_case_is_built_without_connecting() {
        let mut config = DeployConfig::default();
        config.remote.backend = BackendKind::Sftp;
        config.remote.host = "unreachable.invalid".to_string();

        // Construction must not touch the network.
        let _use_case = create_deploy_use_case(&config);
        let connector = ConfiguredConnector::new(config.remote.clone());
        assert_eq!(connector.backend_name(), "sftp");
    }
}
