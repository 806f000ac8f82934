// core/confirm.rs

//! # Confirmation Gate
//!
//! Yes/no checkpoint guarding `apply` and `destroy`. Only the exact answers
//! `yes` and `no` (case-insensitive, surrounding whitespace ignored) end the
//! prompt; anything else re-prompts. There is no timeout.
//!
//! The gate is a trait so callers can choose how a decision is obtained:
//!
//! - [`TerminalPrompt`] asks interactively with line editing (`rustyline`).
//! - [`ReaderPrompt`] reads answers from any buffered reader (piped stdin).
//! - [`FixedDecision`] returns a pre-supplied answer without reading input.

use std::io::{BufRead, Write};

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::Editor;

use crate::error::AppError;

const AFFIRMATIVE: &str = "yes";
const NEGATIVE: &str = "no";

/// Printed after an answer that is neither `yes` nor `no`.
pub const ANSWER_HINT: &str = ">>> Please answer 'yes' or 'no'.";

/// Source of operator decisions.
pub trait ConfirmationGate {
    /// Show `prompt` and block until a decision is made.
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError>;
}

impl<G: ConfirmationGate + ?Sized> ConfirmationGate for Box<G> {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        (**self).confirm(prompt)
    }
}

/// Map one raw answer to a decision, `None` if it is not canonical.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        AFFIRMATIVE => Some(true),
        NEGATIVE => Some(false),
        _ => None,
    }
}

/// Keep calling `read_line` until it yields a canonical answer.
///
/// `read_line` receives the prompt and whether the previous answer was
/// rejected (so it can show [`ANSWER_HINT`] first). It returns `Ok(None)` once
/// input is exhausted, which ends the prompt with `AppError::PromptClosed`.
fn ask_until_decided<R>(prompt: &str, mut read_line: R) -> Result<bool, AppError>
where
    R: FnMut(&str, bool) -> Result<Option<String>, AppError>,
{
    let mut rejected = false;
    loop {
        let Some(answer) = read_line(prompt, rejected)? else {
            return Err(AppError::PromptClosed);
        };
        match parse_answer(&answer) {
            Some(decision) => {
                debug!("Operator answered '{}'", answer.trim());
                return Ok(decision);
            }
            None => rejected = true,
        }
    }
}

/// Interactive prompt on the controlling terminal.
pub struct TerminalPrompt {
    editor: Editor<()>,
}

impl TerminalPrompt {
    pub fn new() -> Result<Self, AppError> {
        let editor = Editor::<()>::new().map_err(AppError::Prompt)?;
        Ok(Self { editor })
    }
}

impl ConfirmationGate for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let editor = &mut self.editor;
        ask_until_decided(prompt, |p, rejected| {
            if rejected {
                println!("{}", ANSWER_HINT);
            }
            match editor.readline(p) {
                Ok(line) => Ok(Some(line)),
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
                Err(e) => Err(AppError::Prompt(e)),
            }
        })
    }
}

/// Prompt that reads answers line by line from `input` and writes prompts
/// and hints to `output`.
pub struct ReaderPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ReaderPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for ReaderPrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let Self { input, output } = self;
        ask_until_decided(prompt, |p, rejected| {
            if rejected {
                writeln!(output, "{}", ANSWER_HINT)?;
            }
            write!(output, "{}", p)?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            Ok(Some(line))
        })
    }
}

/// Pre-supplied decision for non-interactive callers.
pub struct FixedDecision(pub bool);

impl ConfirmationGate for FixedDecision {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let answer = if self.0 { AFFIRMATIVE } else { NEGATIVE };
        println!("{}{} (pre-supplied)", prompt, answer);
        Ok(self.0)
    }
}
