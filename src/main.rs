// main.rs

//! # tfstage - Main Entry Point
//!
//! This is the main entry point for tfstage. It initializes the CLI, configures
//! logging, and dispatches to the workflow commands (`plan`, `apply`, `destroy`).
//!
//! ## Arguments
//!
//! - `--stage`, `-s` - The deployment stage, `dev` or `prod` (required, before the subcommand).
//! - `--working-dir`, `-C` - Terraform working directory (default: `infra`).
//! - `--env-dir` - Directory with `<stage>.env` secret files (default: `envs`).
//! - `--terraform` - Terraform executable name or path (default: `terraform`).
//! - `--yes`, `-y` - Answer `yes` to confirmation prompts.
//! - `--log-level` - The logging level (default: `info`). Possible values: `error`, `warn`, `info`, `debug`, `trace`.
//!
//! ## Example Usage
//! ```bash
//! ./tfstage --stage dev plan
//! ./tfstage --stage prod apply
//! ./tfstage --stage dev destroy --yes
//! ```
//!
//! For detailed help, use `--help` or `-h` flags.

mod app;
mod commands;
mod core;
mod error;
mod utils;

use std::process;

use clap::{ArgMatches, Command};
use log::debug;

use crate::app::{APP_AUTHOR, APP_DESCRIPTION, APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use crate::commands::common_args;
use crate::utils::logging::initialize_logger;

/// Builds the root command with its global flags and subcommands.
fn cli() -> Command {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_DESCRIPTION)
        // ====================
        // Root and Global Flags
        // ====================
        .arg(common_args::stage())
        .arg(common_args::working_dir())
        .arg(common_args::env_dir())
        .arg(common_args::terraform())
        .arg(common_args::assume_yes())
        .arg(common_args::log_level())
        .subcommand_required(true)
        .arg_required_else_help(true)
        // ====================
        // Subcommand Definitions
        // ====================
        .subcommand(commands::plan::command())
        .subcommand(commands::apply::command())
        .subcommand(commands::destroy::command())
}

/// Main function that initializes the CLI and handles command execution.
fn main() {
    let matches = cli().get_matches();

    // ====================
    // Initialize Logger
    // ====================
    let log_level = log_level(&matches);
    initialize_logger(&log_level);

    debug!("Logger initialized with level: {}", log_level);

    // ====================
    // Command Execution
    // ====================
    match matches.subcommand() {
        Some(("plan", sub_matches)) => commands::plan::execute(&matches, sub_matches),
        Some(("apply", sub_matches)) => commands::apply::execute(&matches, sub_matches),
        Some(("destroy", sub_matches)) => commands::destroy::execute(&matches, sub_matches),
        _ => {
            print_error!("Unknown command. Use --help for usage.");
            process::exit(1);
        }
    }
}

/// Global `--log-level`, read where clap propagated it (the subcommand).
fn log_level(matches: &ArgMatches) -> String {
    matches
        .subcommand()
        .map_or(matches, |(_, sub)| sub)
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stage::Stage;
    use clap::error::ErrorKind;
    use std::path::PathBuf;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_parses_stage_and_action() {
        let matches = cli()
            .try_get_matches_from(["tfstage", "--stage", "dev", "plan"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "plan");

        let args = common_args::args_from_matches(&matches, sub);
        assert_eq!(args.stage, Stage::Dev);
        assert_eq!(args.working_dir, PathBuf::from("infra"));
        assert_eq!(args.env_dir, PathBuf::from("envs"));
        assert_eq!(args.terraform, "terraform");
        assert!(!args.assume_yes);
        assert_eq!(log_level(&matches), "info");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "tfstage",
                "--stage",
                "PROD",
                "destroy",
                "--yes",
                "--working-dir",
                "terraform",
                "--log-level",
                "debug",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        let args = common_args::args_from_matches(&matches, sub);
        assert_eq!(args.stage, Stage::Prod);
        assert!(args.assume_yes);
        assert_eq!(args.working_dir, PathBuf::from("terraform"));
        assert_eq!(log_level(&matches), "debug");
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        let err = cli()
            .try_get_matches_from(["tfstage", "--stage", "staging", "plan"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_stage_is_required() {
        let err = cli()
            .try_get_matches_from(["tfstage", "plan"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_action_is_required() {
        let err = cli()
            .try_get_matches_from(["tfstage", "--stage", "dev"])
            .unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }
}
