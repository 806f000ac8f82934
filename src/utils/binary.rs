// utils/binary.rs

//! # Binary Utility Module
//!
//! Locates the Terraform executable before any workflow step runs, so a
//! missing installation is reported as a configuration error instead of a
//! failed `terraform init`.
//!
//! A value containing a path separator is treated as a path to the binary;
//! a bare name is searched for on the `PATH`.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::binary::find_binary;
//!
//! match find_binary("terraform") {
//!     Ok(path) => println!("Found terraform at: {:?}", path),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::AppError;

/// Resolve `program` to an executable file.
pub fn find_binary(program: &str) -> Result<PathBuf, AppError> {
    let path_var = env::var_os("PATH");
    find_binary_in(program, path_var.as_deref())
        .ok_or_else(|| AppError::BinaryNotFound(program.to_string()))
}

/// Resolve `program` against an explicit `PATH` value.
pub fn find_binary_in(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        debug!("Using explicit binary path: {}", candidate.display());
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let binary_name = super::platform::get_binary_name(program);
    let found = env::split_paths(path_var?)
        .map(|dir| dir.join(&binary_name))
        .find(|full_path| full_path.is_file());

    if let Some(ref path) = found {
        debug!("Found {} at {}", binary_name, path.display());
    }
    found
}
