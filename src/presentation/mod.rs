//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Final summaries (text/JSON)
//!
//! ## Usage
//!
//! ```ignore
//! use packdeploy::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case(&config);
//! let report = use_case.execute_with_events(&options, sink)?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{BackendArg, Cli, Commands, ModeArg};
pub use factory::{create_deploy_use_case, create_event_sink, deploy_options};
