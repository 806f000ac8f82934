// app.rs

//! # Application Constants
//!
//! Names, defaults and fixed filesystem layout shared across the CLI.

pub const APP_NAME: &str = "tfstage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_AUTHOR: &str = "tfstage contributors";
pub const APP_DESCRIPTION: &str =
    "Run the Terraform init/plan/apply/destroy lifecycle for a deployment stage";

/// Name of the Terraform executable (without platform suffix).
pub const TERRAFORM_BINARY_NAME: &str = "terraform";

/// Directory Terraform runs in, relative to the invocation directory.
pub const DEFAULT_TERRAFORM_DIR: &str = "infra";

/// Directory holding one `<stage>.env` secret file per stage.
pub const DEFAULT_ENV_DIR: &str = "envs";

/// Variables files live here, relative to the Terraform directory.
pub const CONFIGS_SUBDIR: &str = "configs";

/// Plan artifacts are written here, relative to the Terraform directory.
pub const PLANS_SUBDIR: &str = "plans";

pub const TFVARS_EXTENSION: &str = "tfvars";
pub const TFPLAN_EXTENSION: &str = "tfplan";

/// Second-resolution timestamp embedded in plan file names.
pub const PLAN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Credential variable rewritten to an absolute path before Terraform sees it.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
