// core/runner.rs

//! # Command Runner
//!
//! Runs the Terraform binary in a working directory with an explicit
//! environment overlay, forwarding its output to the console as it arrives.
//!
//! Both child pipes are read line by line on their own threads and funnelled
//! through one channel, so stderr lines are interleaved with stdout lines in
//! arrival order. A nonzero exit is a normal outcome reported through
//! [`CommandResult`]. Errors are a failure to start the process
//! ([`AppError::Spawn`]) or a failure to forward its output or wait for it
//! ([`AppError::Stream`]); in the latter case the child is still reaped first.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use log::debug;

use crate::core::stage::Stage;
use crate::error::{display_code, AppError};
use crate::print_error;

/// Outcome of one external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

#[cfg(test)]
impl CommandResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

/// Something that can run a Terraform command in a working directory.
pub trait CommandExecutor {
    /// Run the tool with `args` in `dir`. `env` is layered over the inherited
    /// parent environment.
    fn run(
        &mut self,
        args: &[String],
        dir: &Path,
        env: &HashMap<String, String>,
    ) -> Result<CommandResult, AppError>;
}

/// Process-backed executor for the real Terraform binary.
pub struct TerraformRunner {
    binary: PathBuf,
    stage: Stage,
}

impl TerraformRunner {
    pub fn new(binary: PathBuf, stage: Stage) -> Self {
        Self { binary, stage }
    }

    /// Printable form of a command line, e.g. `terraform plan -out=...`.
    fn display_command(&self, args: &[String]) -> String {
        let program = self
            .binary
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.binary.display().to_string());
        format_command(&program, args)
    }
}

impl CommandExecutor for TerraformRunner {
    fn run(
        &mut self,
        args: &[String],
        dir: &Path,
        env: &HashMap<String, String>,
    ) -> Result<CommandResult, AppError> {
        let command = self.display_command(args);
        println!(
            "--- Running in {} (stage: {}): {} ---",
            dir.display(),
            self.stage,
            command
        );

        let stdout = io::stdout();
        let result = stream_command(&self.binary, args, dir, env, &command, &mut stdout.lock())?;

        if result.success {
            println!("--- Completed: {} ---", command);
        } else {
            print_error!(
                "--- Command failed: {} (exit code: {}) ---",
                command,
                display_code(&result.code)
            );
        }
        Ok(result)
    }
}

/// Join a program and its arguments for display.
pub fn format_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spawn `program`, forward its merged output line by line into `out`, and
/// wait for it to exit. `command` is the printable command line used in
/// errors.
///
/// If `out` stops accepting writes, the remaining output is discarded but the
/// child still runs to completion and is reaped before the error is returned.
/// Output that does not end in a newline is terminated with one.
pub fn stream_command<W: Write>(
    program: &Path,
    args: &[String],
    dir: &Path,
    env: &HashMap<String, String>,
    command: &str,
    out: &mut W,
) -> Result<CommandResult, AppError> {
    debug!(
        "Spawning {} {:?} in {} with {} extra env vars",
        program.display(),
        args,
        dir.display(),
        env.len()
    );

    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| AppError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel::<String>();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(forward_lines(stderr, tx.clone()));
    }
    // The channel closes once both readers hit EOF.
    drop(tx);

    let mut write_error: Option<io::Error> = None;
    let mut at_line_start = true;
    for line in rx {
        if write_error.is_some() {
            continue;
        }
        at_line_start = line.ends_with('\n');
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
            debug!("output of {} can no longer be written: {}", command, e);
            write_error = Some(e);
        }
    }
    if write_error.is_none() && !at_line_start {
        write_error = out.write_all(b"\n").and_then(|_| out.flush()).err();
    }

    for reader in readers {
        if reader.join().is_err() {
            debug!("output reader thread panicked");
        }
    }

    let status = child.wait().map_err(|source| AppError::Stream {
        command: command.to_string(),
        source,
    })?;
    debug!("{} exited with {}", program.display(), status);

    if let Some(source) = write_error {
        return Err(AppError::Stream {
            command: command.to_string(),
            source,
        });
    }

    Ok(CommandResult {
        success: status.success(),
        code: status.code(),
    })
}

/// Read `pipe` line by line (lossy UTF-8, newline kept) into `tx`.
fn forward_lines<R>(pipe: R, tx: Sender<String>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("error reading child output: {}", e);
                    break;
                }
            }
        }
    })
}
