//! Deploy command handler

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use packdeploy::config::{self, ConfigOverrides};
use packdeploy::presentation::factory::{create_deploy_use_case, create_event_sink, deploy_options};
use packdeploy::presentation::output::render_deploy_summary;
use packdeploy::presentation::BackendArg;
use packdeploy::ui::terminal::detect_capabilities;

/// Execute the deploy command
#[allow(clippy::too_many_arguments)]
pub fn cmd_deploy(
    config_path: Option<&Path>,
    source: Option<PathBuf>,
    backend: Option<BackendArg>,
    force_full: bool,
    dry_run: bool,
    allow_empty: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let overrides = ConfigOverrides {
        backend: backend.map(Into::into),
        local_dir: source,
        force_full,
        allow_empty,
    };

    let config = config::load_layered(config_path, &cwd, &overrides, &mut io::stderr())?;
    config.validate()?;

    let use_case = create_deploy_use_case(&config);
    let options = deploy_options(&config, dry_run);
    let sink = create_event_sink(json, verbose);

    let started = Instant::now();
    let report = use_case.execute_with_events(&options, sink)?;

    if !json {
        let caps = detect_capabilities();
        print!(
            "{}",
            render_deploy_summary(&report, started.elapsed(), caps.supports_unicode)
        );
    }
    Ok(())
}
