//! Pack command handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use packdeploy::application::PackOptions;
use packdeploy::presentation::factory::create_pack_use_case;
use packdeploy::presentation::output::{pack_json, render_pack_summary};
use packdeploy::presentation::ModeArg;
use packdeploy::ui::terminal::detect_capabilities;

/// Execute the pack command from the current project root
pub fn cmd_pack(mode: Option<ModeArg>, output: Option<PathBuf>, json: bool) -> Result<()> {
    let root = std::env::current_dir().context("cannot determine the working directory")?;
    let options = PackOptions::new(root)
        .with_mode(mode.map(Into::into))
        .with_output(output);

    let report = create_pack_use_case().execute(&options)?;

    if json {
        println!("{}", pack_json(&report));
    } else {
        let caps = detect_capabilities();
        print!("{}", render_pack_summary(&report, caps.supports_unicode));
    }
    Ok(())
}
