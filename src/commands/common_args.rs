// commands/common_args.rs

//! # Common Command Arguments
//!
//! Root-level arguments shared by every subcommand, and the struct they are
//! collected into before a workflow runs.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches};

use crate::app::{
    DEFAULT_ENV_DIR, DEFAULT_LOG_LEVEL, DEFAULT_TERRAFORM_DIR, LOG_LEVELS, TERRAFORM_BINARY_NAME,
};
use crate::core::stage::Stage;

/// Required stage selector, given before the subcommand
pub fn stage() -> Arg {
    Arg::new("stage")
        .long("stage")
        .short('s')
        .required(true)
        .help("The deployment stage to operate on")
        .value_parser(value_parser!(Stage))
        .ignore_case(true)
        .action(ArgAction::Set)
}

/// Common argument for setting the log level
pub fn log_level() -> Arg {
    Arg::new("log-level")
        .long("log-level")
        .help("Set the logging level")
        .global(true)
        .value_parser(clap::builder::PossibleValuesParser::new(LOG_LEVELS))
        .ignore_case(true)
        .default_value(DEFAULT_LOG_LEVEL)
        .action(ArgAction::Set)
}

/// Directory Terraform runs in
pub fn working_dir() -> Arg {
    Arg::new("working-dir")
        .long("working-dir")
        .short('C')
        .help("Terraform working directory")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_TERRAFORM_DIR)
        .action(ArgAction::Set)
}

/// Directory holding `<stage>.env` secret files
pub fn env_dir() -> Arg {
    Arg::new("env-dir")
        .long("env-dir")
        .help("Directory containing per-stage secret files (<stage>.env)")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_ENV_DIR)
        .action(ArgAction::Set)
}

/// Terraform executable name or path
pub fn terraform() -> Arg {
    Arg::new("terraform")
        .long("terraform")
        .help("Terraform executable to run (name on PATH or explicit path)")
        .global(true)
        .default_value(TERRAFORM_BINARY_NAME)
        .action(ArgAction::Set)
}

/// Answer `yes` to every confirmation prompt
pub fn assume_yes() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .help("Answer 'yes' to confirmation prompts (non-interactive runs)")
        .global(true)
        .action(ArgAction::SetTrue)
}

/// Structure to hold common command arguments
#[derive(Debug, Clone)]
pub struct CommonCommandArgs {
    /// Stage to operate on
    pub stage: Stage,
    /// Terraform working directory
    pub working_dir: PathBuf,
    /// Directory with per-stage secret files
    pub env_dir: PathBuf,
    /// Terraform executable name or path
    pub terraform: String,
    /// Skip interactive confirmation with a fixed `yes`
    pub assume_yes: bool,
}

/// Create CommonCommandArgs from the root and subcommand ArgMatches.
///
/// `--stage` lives on the root; global flags are read from the subcommand,
/// which sees them wherever they were given. Every value read here is
/// required or defaulted by clap.
pub fn args_from_matches(root: &ArgMatches, sub: &ArgMatches) -> CommonCommandArgs {
    CommonCommandArgs {
        stage: *root.get_one::<Stage>("stage").unwrap(),
        working_dir: sub.get_one::<PathBuf>("working-dir").unwrap().clone(),
        env_dir: sub.get_one::<PathBuf>("env-dir").unwrap().clone(),
        terraform: sub.get_one::<String>("terraform").unwrap().clone(),
        assume_yes: sub.get_flag("yes"),
    }
}
