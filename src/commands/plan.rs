// commands/plan.rs

//! # Plan Command Module
//!
//! This module provides the `plan` command. After `terraform init`, it runs
//! `terraform plan` with the stage's variables file and saves the execution
//! plan under `plans/` in the Terraform working directory. Nothing is applied.
//!
//! ## Example Usage
//! ```bash
//! ./tfstage --stage dev plan
//! ```

use clap::{ArgMatches, Command};

use crate::commands::base::execute_action;
use crate::core::stage::Action;

/// Configures the `plan` command for the CLI application.
pub fn command() -> Command {
    Command::new("plan").about("Generate and save an execution plan")
}

/// Executes the `plan` command.
pub fn execute(root: &ArgMatches, matches: &ArgMatches) {
    execute_action(Action::Plan, root, matches);
}
