// core/env.rs

//! # Stage Secret Handling
//!
//! Loads the per-stage secret file (`<env_dir>/<stage>.env`) into an explicit
//! key/value map that is handed to every Terraform invocation, instead of
//! mutating the process environment.
//!
//! Variables already present in the parent environment are not overridden by
//! the file. A relative credential path is rewritten to an absolute one
//! anchored at the invocation directory, since Terraform runs in a different
//! working directory.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::CREDENTIALS_ENV_VAR;
use crate::core::stage::Stage;
use crate::error::AppError;

/// Path of the secret file for `stage` under `env_dir`.
pub fn secret_file_path(env_dir: &Path, stage: Stage) -> PathBuf {
    env_dir.join(format!("{}.env", stage))
}

/// Load the secret file for `stage` and build the environment overlay for
/// Terraform. Relative credential paths are resolved against `base_dir`.
///
/// # Errors
/// - `AppError::SecretFileNotFound` if the file does not exist.
/// - `AppError::SecretFile` if a line cannot be parsed.
pub fn load_stage_secrets(
    env_dir: &Path,
    stage: Stage,
    base_dir: &Path,
) -> Result<HashMap<String, String>, AppError> {
    let path = secret_file_path(env_dir, stage);
    let file_vars = read_env_file(&path)?;
    Ok(build_stage_env(
        file_vars,
        |key| env::var(key).ok(),
        base_dir,
    ))
}

/// Parse a `.env` file into `(key, value)` pairs, preserving file order.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, AppError> {
    if !path.is_file() {
        return Err(AppError::SecretFileNotFound(path.to_path_buf()));
    }

    debug!("Loading environment variables from: {}", path.display());
    let to_error = |source| AppError::SecretFile {
        path: path.to_path_buf(),
        source,
    };

    let mut vars = Vec::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        debug!("  Loaded env var: {}", key);
        vars.push((key, value));
    }
    Ok(vars)
}

/// Build the environment overlay from file variables.
///
/// `parent` looks up a variable in the parent environment; keys it knows are
/// left out of the overlay so the child inherits the parent's value.
pub fn build_stage_env<F>(
    file_vars: Vec<(String, String)>,
    parent: F,
    base_dir: &Path,
) -> HashMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_vars = HashMap::new();

    for (key, value) in file_vars {
        if parent(&key).is_some() {
            debug!("  Keeping parent value for env var: {}", key);
            continue;
        }
        env_vars.insert(key, value);
    }

    let credentials = env_vars
        .get(CREDENTIALS_ENV_VAR)
        .cloned()
        .or_else(|| parent(CREDENTIALS_ENV_VAR));

    if let Some(creds) = credentials {
        if let Some(absolute) = absolutize(&creds, base_dir) {
            debug!(
                "Resolved {} to absolute path: {}",
                CREDENTIALS_ENV_VAR,
                absolute.display()
            );
            env_vars.insert(
                CREDENTIALS_ENV_VAR.to_string(),
                absolute.to_string_lossy().into_owned(),
            );
        }
    }

    env_vars
}

/// Returns `Some(base_dir/path)` when `path` is relative, `None` otherwise.
fn absolutize(path: &str, base_dir: &Path) -> Option<PathBuf> {
    if path.is_empty() || Path::new(path).is_absolute() {
        return None;
    }
    Some(base_dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_parent(_: &str) -> Option<String> {
        None
    }

    fn write_env_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_secret_file_path() {
        assert_eq!(
            secret_file_path(Path::new("envs"), Stage::Dev),
            PathBuf::from("envs/dev.env")
        );
        assert_eq!(
            secret_file_path(Path::new("envs"), Stage::Prod),
            PathBuf::from("envs/prod.env")
        );
    }

    #[test]
    fn test_missing_secret_file() {
        let dir = TempDir::new().unwrap();
        let err = load_stage_secrets(dir.path(), Stage::Dev, dir.path()).unwrap_err();
        assert!(matches!(err, AppError::SecretFileNotFound(ref p) if p.ends_with("dev.env")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_read_env_file() {
        let dir = TempDir::new().unwrap();
        let path = write_env_file(
            &dir,
            "dev.env",
            &["# comment", "TF_VAR_project=demo", "TF_VAR_region=\"eu-west-1\""],
        );

        let vars = read_env_file(&path).unwrap();
        assert_eq!(
            vars,
            vec![
                ("TF_VAR_project".to_string(), "demo".to_string()),
                ("TF_VAR_region".to_string(), "eu-west-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_relative_credentials_become_absolute() {
        let vars = vec![(
            CREDENTIALS_ENV_VAR.to_string(),
            "keys/dev-sa.json".to_string(),
        )];
        let env_vars = build_stage_env(vars, no_parent, Path::new("/work/project"));

        assert_eq!(
            env_vars.get(CREDENTIALS_ENV_VAR).unwrap(),
            "/work/project/keys/dev-sa.json"
        );
    }

    #[test]
    fn test_absolute_credentials_untouched() {
        let vars = vec![(
            CREDENTIALS_ENV_VAR.to_string(),
            "/etc/keys/sa.json".to_string(),
        )];
        let env_vars = build_stage_env(vars, no_parent, Path::new("/work/project"));

        assert_eq!(env_vars.get(CREDENTIALS_ENV_VAR).unwrap(), "/etc/keys/sa.json");
    }

    #[test]
    fn test_parent_environment_wins() {
        let vars = vec![
            ("TF_VAR_project".to_string(), "from-file".to_string()),
            ("TF_VAR_zone".to_string(), "a".to_string()),
        ];
        let parent = |key: &str| (key == "TF_VAR_project").then(|| "from-parent".to_string());
        let env_vars = build_stage_env(vars, parent, Path::new("/work"));

        assert!(!env_vars.contains_key("TF_VAR_project"));
        assert_eq!(env_vars.get("TF_VAR_zone").unwrap(), "a");
    }

    #[test]
    fn test_relative_credentials_from_parent_are_rewritten() {
        let parent = |key: &str| (key == CREDENTIALS_ENV_VAR).then(|| "sa.json".to_string());
        let env_vars = build_stage_env(Vec::new(), parent, Path::new("/work"));

        assert_eq!(env_vars.get(CREDENTIALS_ENV_VAR).unwrap(), "/work/sa.json");
    }
}
