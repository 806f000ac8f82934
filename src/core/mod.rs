// core/mod.rs

//! # Core Module
//!
//! The staged Terraform workflow: stage model, secret loading, the command
//! runner, plan production, the confirmation gate and the orchestrator that
//! sequences them.

pub mod confirm;
pub mod env;
pub mod plan;
pub mod runner;
pub mod stage;
pub mod workflow;
