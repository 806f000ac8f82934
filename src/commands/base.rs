// commands/base.rs

//! # Base Command Module
//!
//! Shared execution path for the `plan`, `apply` and `destroy` commands:
//! load the stage's secrets, locate Terraform, pick a confirmation gate, run
//! the workflow and turn its outcome into a final status line and exit code.
//!
//! Configuration problems (missing secret file, Terraform not installed,
//! missing working directory) are detected here, before Terraform is invoked.

use std::env;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::ArgMatches;
use log::debug;

use crate::commands::common_args::{args_from_matches, CommonCommandArgs};
use crate::core::confirm::{ConfirmationGate, FixedDecision, ReaderPrompt, TerminalPrompt};
use crate::core::env::{load_stage_secrets, secret_file_path};
use crate::core::runner::TerraformRunner;
use crate::core::stage::{Action, Stage};
use crate::core::workflow::{Outcome, Workflow, WorkflowContext};
use crate::error::AppError;
use crate::utils::binary::find_binary;
use crate::utils::display::{print_unicode_box, BorderColor};
use crate::{print_error, print_info, print_success, print_warning};

/// Everything needed to start a workflow for one invocation.
#[derive(Debug)]
pub struct PreparedRun {
    pub context: WorkflowContext,
    pub binary: PathBuf,
}

/// Resolve secrets, binary and working directory against `base_dir`.
///
/// Secrets are loaded first, so a missing secret file is reported before
/// anything else is checked.
pub fn prepare_run(args: &CommonCommandArgs, base_dir: &Path) -> Result<PreparedRun, AppError> {
    let env_dir = base_dir.join(&args.env_dir);
    let env = load_stage_secrets(&env_dir, args.stage, base_dir)?;
    print_success!(
        "✅ Loaded secrets from {}",
        secret_file_path(&args.env_dir, args.stage).display()
    );

    let binary = base_dir.join(find_binary(&args.terraform)?);
    print_info!("Using Terraform at {}", binary.display());

    let working_dir = base_dir.join(&args.working_dir);
    if !working_dir.is_dir() {
        return Err(AppError::WorkingDirNotFound(working_dir));
    }

    Ok(PreparedRun {
        context: WorkflowContext {
            stage: args.stage,
            working_dir,
            env,
        },
        binary,
    })
}

/// Choose how confirmation answers are obtained.
pub fn select_gate(assume_yes: bool) -> Result<Box<dyn ConfirmationGate>, AppError> {
    if assume_yes {
        debug!("Confirmation answered by --yes");
        return Ok(Box::new(FixedDecision(true)));
    }
    if io::stdin().is_terminal() {
        return Ok(Box::new(TerminalPrompt::new()?));
    }
    debug!("stdin is not a terminal, reading answers line by line");
    Ok(Box::new(ReaderPrompt::new(io::stdin().lock(), io::stdout())))
}

/// Run `action` for the invocation described by `args`.
pub fn run_action(action: Action, args: &CommonCommandArgs) -> Result<Outcome, AppError> {
    let base_dir = env::current_dir()?;
    let PreparedRun { context, binary } = prepare_run(args, &base_dir)?;
    let gate = select_gate(args.assume_yes)?;
    let runner = TerraformRunner::new(binary, args.stage);

    Workflow::new(context, runner, gate).run(action)
}

/// Final line printed for every terminal state.
pub fn status_line(stage: Stage, action: Action, result: &Result<Outcome, AppError>) -> String {
    match result {
        Ok(Outcome::Planned(artifact)) => format!(
            "🎉 '{}' stage '{}' completed. Plan saved to {}",
            stage,
            action,
            artifact.path.display()
        ),
        Ok(Outcome::Applied(artifact)) => format!(
            "🎉 '{}' stage '{}' completed. Applied {}",
            stage,
            action,
            artifact.path.display()
        ),
        Ok(Outcome::Destroyed) => format!("🎉 '{}' stage '{}' completed.", stage, action),
        Ok(Outcome::Cancelled) => format!(
            "'{}' stage '{}' cancelled by operator.",
            stage, action
        ),
        Err(_) => format!("'{}' stage '{}' failed.", stage, action),
    }
}

/// Print the outcome and return the process exit code.
pub fn report(stage: Stage, action: Action, result: &Result<Outcome, AppError>) -> i32 {
    let line = status_line(stage, action, result);
    match result {
        Ok(Outcome::Cancelled) => {
            print_warning!("--- Operation cancelled by operator. ---");
            println!("\n{}", line);
            0
        }
        Ok(_) => {
            println!();
            print_unicode_box(&line, BorderColor::Green);
            0
        }
        Err(e) => {
            print_error!("Error: {}", e);
            print_error!("{}", line);
            e.exit_code()
        }
    }
}

/// Entry point used by each workflow subcommand.
pub fn execute_action(action: Action, root: &ArgMatches, sub: &ArgMatches) {
    let args = args_from_matches(root, sub);
    debug!("Command arguments: {:?}", args);

    print_unicode_box(
        &format!("Terraform {} for stage: [{}]", action, args.stage),
        BorderColor::Yellow,
    );

    let result = run_action(action, &args);
    let code = report(args.stage, action, &result);
    if code != 0 {
        process::exit(code);
    }
}
