//! CLI Argument Parsing
//!
//! Global flags (`--json`, `--verbose`, `--config`) are inherited by every
//! subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::PackMode;
use crate::config::BackendKind;

/// Backend choice as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Bulk,
    Sftp,
    Local,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Bulk => BackendKind::Bulk,
            BackendArg::Sftp => BackendKind::Sftp,
            BackendArg::Local => BackendKind::Local,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Client,
    Server,
}

impl From<ModeArg> for PackMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Client => PackMode::Client,
            ModeArg::Server => PackMode::Server,
        }
    }
}

/// packdeploy - build modpack trees and deploy them incrementally
#[derive(Parser, Debug)]
#[command(name = "packdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v shows every file)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./packdeploy.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload changed files and remove stale ones on the target
    Deploy {
        /// Local build directory (default: build/server)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Remote operation backend
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// Upload every file regardless of the manifest
        #[arg(long)]
        force_full: bool,

        /// Show the plan without touching the target
        #[arg(long)]
        dry_run: bool,

        /// Allow an empty build directory to remove every published file
        #[arg(long)]
        allow_empty: bool,
    },

    /// Build client and/or server trees from the current project
    Pack {
        /// Build only this side (both when omitted)
        #[arg(value_enum)]
        mode: Option<ModeArg>,

        /// Output directory for a single-mode build
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn deploy_flags_parse() {
        let cli = Cli::try_parse_from([
            "packdeploy",
            "deploy",
            "--source",
            "out",
            "--backend",
            "sftp",
            "--force-full",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Deploy {
                source,
                backend,
                force_full,
                dry_run,
                allow_empty,
            } => {
                assert!(!allow_empty);
                assert_eq!(source, Some(PathBuf::from("out")));
                assert_eq!(backend, Some(BackendArg::Sftp));
                assert!(force_full);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["packdeploy", "pack", "server", "--json", "-vv"]).unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Pack {
                mode: Some(ModeArg::Server),
                output: None
            }
        ));
    }

    #[test]
    fn allow_empty_is_opt_in() {
        let cli = Cli::try_parse_from(["packdeploy", "deploy", "--allow-empty"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Deploy {
                allow_empty: true,
                ..
            }
        ));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["packdeploy", "deploy", "--backend", "ftp"]).is_err());
    }

    #[test]
    fn arg_conversions() {
        assert_eq!(BackendKind::from(BackendArg::Local), BackendKind::Local);
        assert_eq!(PackMode::from(ModeArg::Client), PackMode::Client);
    }
}
