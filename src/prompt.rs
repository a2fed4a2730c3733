//! Line-oriented user input.
//!
//! The session loop and the deletion guard never touch stdin directly; they
//! ask a [`Prompt`].  Real sessions use [`StdinPrompt`], tests script the
//! answers with [`ScriptedPrompt`].

use std::io::{self, BufRead, IsTerminal};

use console::{Term, style};

/// Something that can ask the operator a question and read one line back.
pub trait Prompt {
    /// Show `question` and return the answer without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

// ─── stdin ────────────────────────────────────────────────────────────────────

/// Asks on the terminal, or reads piped stdin when nobody is attending.
///
/// Interactive sessions go through [`console::Term`] for line editing.  With
/// stdin or stdout redirected (`printf '4\n8\n' | ducryptacy …`) the answer is
/// read as raw bytes, so a line that is not valid UTF-8 arrives as an
/// unusable answer instead of an error.
#[derive(Debug)]
pub struct StdinPrompt {
    term: Term,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn attended(&self) -> bool {
        self.term.features().is_attended() && io::stdin().is_terminal()
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.term.write_str(&style(question).bold().to_string())?;
        self.term.flush()?;

        if self.attended() {
            return self.term.read_line().map(Some);
        }
        read_answer(&mut io::stdin().lock())
    }
}

/// Read one line from `reader`, replacing invalid UTF-8.  `None` at EOF.
fn read_answer(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }
    Ok(Some(strip_newline(String::from_utf8_lossy(&raw).into_owned())))
}

fn strip_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

// ─── scripted ─────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use scripted::ScriptedPrompt;
