// core/plan.rs

//! # Plan Producer
//!
//! Runs `terraform plan` for a stage and records where the plan artifact was
//! written. Paths are relative to the Terraform working directory:
//!
//! - variables file: `configs/<stage>.tfvars`
//! - plan file: `plans/<stage>_<YYYYMMDD_HHMMSS>.tfplan`
//!
//! A failed plan yields no artifact and is never retried.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::app::{
    CONFIGS_SUBDIR, PLANS_SUBDIR, PLAN_TIMESTAMP_FORMAT, TFPLAN_EXTENSION, TFVARS_EXTENSION,
};
use crate::core::runner::CommandExecutor;
use crate::core::stage::Stage;
use crate::error::AppError;
use crate::{print_error, print_success};

/// A generated execution plan, consumable once by `terraform apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanArtifact {
    /// Path relative to the Terraform working directory.
    pub path: PathBuf,
    pub stage: Stage,
    pub timestamp: String,
}

impl PlanArtifact {
    /// The path as handed to Terraform on the command line.
    pub fn arg(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Relative path of the variables file for `stage`.
pub fn tfvars_path(stage: Stage) -> PathBuf {
    Path::new(CONFIGS_SUBDIR).join(format!("{}.{}", stage, TFVARS_EXTENSION))
}

/// Relative path of the plan file for `stage` at `timestamp`.
pub fn plan_file_path(stage: Stage, timestamp: &str) -> PathBuf {
    Path::new(PLANS_SUBDIR).join(format!("{}_{}.{}", stage, timestamp, TFPLAN_EXTENSION))
}

/// Format a moment as the second-resolution plan timestamp.
pub fn plan_timestamp(now: DateTime<Local>) -> String {
    now.format(PLAN_TIMESTAMP_FORMAT).to_string()
}

/// `plan -var-file=<vars> -out=<plan>`
pub fn plan_args(tfvars: &Path, plan_file: &Path) -> Vec<String> {
    vec![
        "plan".to_string(),
        format!("-var-file={}", tfvars.display()),
        format!("-out={}", plan_file.display()),
    ]
}

/// Create `<dir>/plans`. Succeeds if it already exists.
pub fn ensure_plans_dir(dir: &Path) -> Result<PathBuf, AppError> {
    let plans_dir = dir.join(PLANS_SUBDIR);
    fs::create_dir_all(&plans_dir)?;
    Ok(plans_dir)
}

/// Run `terraform plan` for `stage` in `dir`, stamping the plan with `now`.
///
/// Returns `Ok(None)` when Terraform reports failure. `Err` is reserved for
/// failures to create the plans directory or to start the process.
pub fn produce_plan<E: CommandExecutor>(
    executor: &mut E,
    stage: Stage,
    dir: &Path,
    env: &HashMap<String, String>,
    now: DateTime<Local>,
) -> Result<Option<PlanArtifact>, AppError> {
    println!("--- Generating plan for the '{}' stage... ---", stage);

    let plans_dir = ensure_plans_dir(dir)?;
    debug!("Plans directory: {}", plans_dir.display());

    let timestamp = plan_timestamp(now);
    let tfvars = tfvars_path(stage);
    let plan_file = plan_file_path(stage, &timestamp);

    let result = executor.run(&plan_args(&tfvars, &plan_file), dir, env)?;
    if !result.success {
        print_error!("Terraform plan failed.");
        return Ok(None);
    }

    print_success!(
        "Plan file saved: {}",
        dir.join(&plan_file).display()
    );
    Ok(Some(PlanArtifact {
        path: plan_file,
        stage,
        timestamp,
    }))
}
