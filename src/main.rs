//! packdeploy CLI
//!
//! Usage: packdeploy <COMMAND>
//!
//! Commands:
//!   deploy   Upload changed files and remove stale ones on the target
//!   pack     Build client and/or server trees from the current project
//!   version  Show version information

use clap::Parser;

use packdeploy::infrastructure::JsonEventSink;
use packdeploy::DeployError;
use packdeploy::presentation::{Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    let command_name = match &cli.command {
        Commands::Deploy { .. } => "deploy",
        Commands::Pack { .. } => "pack",
        Commands::Version => "version",
    };

    if let Err(err) = run(cli) {
        let hint = err.downcast_ref::<DeployError>().and_then(DeployError::hint);
        if json {
            let message = match hint {
                Some(hint) => format!("{:#} ({})", err, hint),
                None => format!("{:#}", err),
            };
            JsonEventSink::stdout().error(command_name, &message);
        } else {
            eprintln!("Error: {:#}", err);
            if let Some(hint) = hint {
                eprintln!("Hint: {}", hint);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Deploy {
            source,
            backend,
            force_full,
            dry_run,
            allow_empty,
        } => commands::cmd_deploy(
            cli.config.as_deref(),
            source,
            backend,
            force_full,
            dry_run,
            allow_empty,
            cli.json,
            cli.verbose,
        ),
        Commands::Pack { mode, output } => commands::cmd_pack(mode, output, cli.json),
        Commands::Version => commands::cmd_version(cli.json),
    }
}
