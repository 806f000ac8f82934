// core/stage.rs

//! # Stage and Action Types
//!
//! The two closed sets an invocation is parameterized by: the deployment
//! `Stage` and the requested workflow `Action`. Both display as their
//! canonical lowercase names, which are also the names used in file paths
//! (`envs/dev.env`, `configs/prod.tfvars`).

use std::fmt;

use clap::ValueEnum;

/// Target deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "lower")]
pub enum Stage {
    Dev,
    Prod,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dev => "dev",
            Stage::Prod => "prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Plan,
    Apply,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Plan => "plan",
            Action::Apply => "apply",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
