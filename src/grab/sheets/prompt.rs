//! Yes/no confirmations asked before destructive writes.

use std::io::{self, BufRead, Write};

use crate::grab::sheets::error::Result;

/// Something that can answer a yes/no question.
pub trait Confirm {
    /// Returns `true` only for an affirmative answer.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Asks on stdout and reads the answer from stdin. Only `y` (any case)
/// counts as yes.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} (Y/N) ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Answers yes to everything, for unattended runs.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
