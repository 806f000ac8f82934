// commands/apply.rs

//! # Apply Command Module
//!
//! This module provides the `apply` command. It produces a fresh plan for the
//! stage, shows where it was saved, and applies exactly that plan once the
//! operator answers `yes`. Answering `no` cancels without changing anything.
//!
//! ## Example Usage
//! ```bash
//! ./tfstage --stage prod apply
//! ./tfstage --stage dev apply --yes
//! ```

use clap::{ArgMatches, Command};

use crate::commands::base::execute_action;
use crate::core::stage::Action;

/// Configures the `apply` command for the CLI application.
pub fn command() -> Command {
    Command::new("apply").about("Generate a plan, ask for confirmation, and apply it")
}

/// Executes the `apply` command.
pub fn execute(root: &ArgMatches, matches: &ArgMatches) {
    execute_action(Action::Apply, root, matches);
}
