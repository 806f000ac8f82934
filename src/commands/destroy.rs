// commands/destroy.rs

//! # Destroy Command Module
//!
//! This module provides the `destroy` command, which tears down every resource
//! Terraform manages for a stage. A warning naming the stage is shown and the
//! operator must answer `yes` before `terraform destroy -auto-approve` runs.
//!
//! ## Example Usage
//! ```bash
//! ./tfstage --stage dev destroy
//! ```

use clap::{ArgMatches, Command};

use crate::commands::base::execute_action;
use crate::core::stage::Action;

/// Configures the `destroy` command for the CLI application.
pub fn command() -> Command {
    Command::new("destroy").about("Ask for confirmation and destroy all resources of the stage")
}

/// Executes the `destroy` command.
pub fn execute(root: &ArgMatches, matches: &ArgMatches) {
    execute_action(Action::Destroy, root, matches);
}
