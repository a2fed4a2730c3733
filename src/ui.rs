//! Terminal UI and command execution.
//!
//! # Design goals
//!
//! - **Native tool output.** The backup tool runs with inherited stdin/stdout/stderr so the
//!   operator sees its revision listings and progress exactly as printed.
//! - **One verdict line per step.** After each command a green ✓ or red ✗ line states the outcome;
//!   failures add the exit code or spawn error underneath.
//! - **Testable without a terminal or a backup tool.** Execution goes through the [`Executor`]
//!   trait and every rendering function takes a `&mut dyn Write`.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::Command,
    time::Duration,
};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames, same as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Green ✓: printed when a step succeeds.
pub fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
/// Red ✗: printed when a step fails.
pub fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
/// Yellow !: printed for skipped steps and warnings.
pub fn icon_warn() -> console::StyledObject<&'static str> {
    style("!").yellow().bold()
}

// ─── Command result ───────────────────────────────────────────────────────────

/// Exit status of one external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Process exit code.  `None` when the process could not be spawned or
    /// was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandResult {
    /// Zero exit code.
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

// ─── Executor ─────────────────────────────────────────────────────────────────

/// Runs an argument vector to completion and reports its exit code.
///
/// `Ok(None)` means the process ran but ended without an exit code (signal).
/// `Err` means it never started.
pub trait Executor {
    fn execute(&mut self, argv: &[String]) -> Result<Option<i32>>;
}

/// Spawns real processes inside a fixed working directory.
///
/// The directory is set per command rather than by changing the process-wide
/// cwd, so it keeps working after the directory has been deleted and
/// recreated.
#[derive(Debug)]
pub struct SystemExecutor {
    working_dir: PathBuf,
}

impl SystemExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, argv: &[String]) -> Result<Option<i32>> {
        let (prog, rest) = argv.split_first().context("cannot run an empty command")?;

        log::debug!("spawning {argv:?} in {}", self.working_dir.display());

        let status = Command::new(prog)
            .args(rest)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("failed to spawn: {}", argv.join(" ")))?;

        log::debug!("{prog} exited with {status}");
        Ok(status.code())
    }
}

// ─── Command runner ───────────────────────────────────────────────────────────

/// Run `argv` through `exec` and print `on_success` or `on_failure`.
///
/// Command failures never surface as `Err`: a non-zero exit or a spawn error
/// is printed (with the diagnostic) and returned as an unsuccessful
/// [`CommandResult`] for the caller to branch on.  `Err` is reserved for
/// failures writing to `out`.
pub fn run_command(
    exec: &mut dyn Executor,
    out: &mut dyn Write,
    argv: &[String],
    on_success: &str,
    on_failure: &str,
) -> io::Result<CommandResult> {
    match exec.execute(argv) {
        Ok(Some(0)) => {
            writeln!(out, "  {}  {}", icon_ok(), style(on_success).bold())?;
            Ok(CommandResult { code: Some(0) })
        },
        Ok(code) => {
            writeln!(out, "  {}  {}", icon_err(), style(on_failure).bold())?;
            let why = code.map_or_else(
                || "terminated by a signal".to_string(),
                |c| format!("exited with code {c}"),
            );
            writeln!(out, "  {} `{}` {why}", style("►").dim(), argv.join(" "))?;
            log::info!("{argv:?} failed: {why}");
            Ok(CommandResult { code })
        },
        Err(e) => {
            writeln!(out, "  {}  {}", icon_err(), style(on_failure).bold())?;
            writeln!(out, "  {} {e:#}", style("Error:").red().bold())?;
            log::info!("{argv:?} could not be started: {e:#}");
            Ok(CommandResult { code: None })
        },
    }
}

/// Print a yellow "skipped" line explaining why a step did not run.
pub fn print_skipped(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "  {}  {}", icon_warn(), style(msg).yellow())
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label`.
///
/// The spinner ticks at ~80 ms and is cleared with
/// [`ProgressBar::finish_and_clear`].  It draws to stderr and stays hidden
/// when stderr is not a terminal.
pub fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(st) = ProgressStyle::with_template("  {spinner:.cyan}  {msg}") {
        pb.set_style(st.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Test executor ────────────────────────────────────────────────────────────

#[cfg(test)]
pub use recording::RecordingExecutor;


// ─── Tests ────────────────────────────────────────────────────────────────────
