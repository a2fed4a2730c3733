//! The interactive menu loop.
//!
//! A session sits in [`SessionState::MenuWait`]: print the menu, read one
//! line, run the selected workflow to completion, repeat.  It leaves only
//! through the Exit entry or end of input, both of which are normal
//! terminations.
//!
//! Workflow failures are printed by the workflows themselves and never end
//! the loop.  The only errors returned from here are terminal I/O errors.

use std::io::{self, Write};

use console::style;

use crate::{
    commands,
    config::Config,
    guard::{self, DeletionOutcome},
    prompt::Prompt,
    ui::{self, CommandResult, Executor},
};

// ─── Menu ─────────────────────────────────────────────────────────────────────

/// One entry of the fixed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowChoice {
    Init,
    EncryptAndDelete,
    Decrypt,
    Encrypt,
    Restore,
    Delete,
    DecryptAndRun,
    Exit,
}

impl WorkflowChoice {
    /// Every choice, in menu order.  Entry `n` is selected by typing `n + 1`.
    pub const ALL: [Self; 8] = [
        Self::Init,
        Self::EncryptAndDelete,
        Self::Decrypt,
        Self::Encrypt,
        Self::Restore,
        Self::Delete,
        Self::DecryptAndRun,
        Self::Exit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::EncryptAndDelete => "Encrypt and Delete",
            Self::Decrypt => "Decrypt",
            Self::Encrypt => "Encrypt",
            Self::Restore => "Restore",
            Self::Delete => "Delete",
            Self::DecryptAndRun => "Decrypt and Run",
            Self::Exit => "Exit",
        }
    }

    /// Parse a menu selection such as `"3"` (surrounding whitespace ignored).
    pub fn from_input(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }
}

/// The menu text, one line per entry.
pub fn menu_text() -> String {
    WorkflowChoice::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}\n", i + 1, c.label()))
        .collect()
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// Where the loop is after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    MenuWait,
    Exited,
}

/// Everything a workflow needs: the immutable config plus the three I/O seams.
pub struct Session<'a> {
    pub cfg: &'a Config,
    pub exec: &'a mut dyn Executor,
    pub prompt: &'a mut dyn Prompt,
    pub out: &'a mut dyn Write,
}

impl Session<'_> {
    /// Run menu iterations until the operator exits.
    pub fn run(&mut self) -> io::Result<()> {
        while self.step()? == SessionState::MenuWait {}
        log::info!("session ended");
        Ok(())
    }

    /// One menu iteration: warn, show the menu, read a choice, run it.
    pub fn step(&mut self) -> io::Result<SessionState> {
        self.warn_if_unencrypted()?;
        write!(self.out, "{}", menu_text())?;
        self.out.flush()?;

        let Some(line) = self.prompt.ask("Select an option: ")? else {
            writeln!(self.out)?;
            return Ok(SessionState::Exited);
        };

        let state = match WorkflowChoice::from_input(&line) {
            Some(WorkflowChoice::Exit) => SessionState::Exited,
            Some(choice) => {
                log::info!("running workflow: {}", choice.label());
                commands::dispatch(self, choice)?;
                SessionState::MenuWait
            },
            None => {
                writeln!(self.out, "Invalid option. Please choose again.")?;
                SessionState::MenuWait
            },
        };

        if state == SessionState::MenuWait {
            writeln!(self.out, "\n")?;
        }
        Ok(state)
    }

    /// Print the red banner when the tool's metadata directory is present.
    fn warn_if_unencrypted(&mut self) -> io::Result<()> {
        if self.cfg.marker_path().exists() {
            writeln!(
                self.out,
                "{}",
                style(format!(
                    "WARNING: The {} file is present. The files may be unencrypted.",
                    crate::config::MARKER_NAME
                ))
                .red()
                .bold()
            )?;
        }
        Ok(())
    }

    // ── helpers used by the workflows ────────────────────────────────────────

    /// Run one command through the executor, printing its verdict.
    pub fn command(
        &mut self,
        argv: &[String],
        on_success: &str,
        on_failure: &str,
    ) -> io::Result<CommandResult> {
        ui::run_command(&mut *self.exec, &mut *self.out, argv, on_success, on_failure)
    }

    /// Ask for confirmation and clear the repository.
    pub fn delete_repository(&mut self) -> io::Result<DeletionOutcome> {
        guard::confirm_and_delete(&mut *self.prompt, &mut *self.out, &self.cfg.repository)
    }

    /// Print a skipped-step notice.
    pub fn skipped(&mut self, msg: &str) -> io::Result<()> {
        ui::print_skipped(&mut *self.out, msg)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::commands::harness::Harness;

    // ── WorkflowChoice ────────────────────────────────────────────────────────

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(WorkflowChoice::from_input("1"), Some(WorkflowChoice::Init));
        assert_eq!(WorkflowChoice::from_input("3"), Some(WorkflowChoice::Decrypt));
        assert_eq!(WorkflowChoice::from_input(" 6 "), Some(WorkflowChoice::Delete));
        assert_eq!(WorkflowChoice::from_input("8"), Some(WorkflowChoice::Exit));
    }

    #[test]
    fn garbage_is_not_a_choice() {
        for input in ["", "0", "9", "-1", "one", "1.0", "exit"] {
            assert_eq!(WorkflowChoice::from_input(input), None, "{input:?}");
        }
    }

    #[test]
    fn snapshot_menu() {
        insta::assert_snapshot!(menu_text().trim_end(), @r"
        1. Init
        2. Encrypt and Delete
        3. Decrypt
        4. Encrypt
        5. Restore
        6. Delete
        7. Decrypt and Run
        8. Exit
        ");
    }

    // ── Session loop ──────────────────────────────────────────────────────────

    #[test]
    fn exit_choice_ends_session() {
        let mut h = Harness::new(&["8"]);
        assert_eq!(h.session().step().unwrap(), SessionState::Exited);
        assert!(h.exec.calls.is_empty());
    }

    #[test]
    fn end_of_input_ends_session() {
        let mut h = Harness::new(&[]);
        h.session().run().unwrap();
        assert_eq!(h.prompt.asked, vec!["Select an option: "]);
    }

    #[test]
    fn invalid_input_keeps_waiting_and_runs_nothing() {
        let mut h = Harness::new(&["banana", "8"]);
        assert_eq!(h.session().step().unwrap(), SessionState::MenuWait);
        assert!(h.output().contains("Invalid option. Please choose again."));
        assert!(h.exec.calls.is_empty());

        h.session().run().unwrap();
        assert_eq!(h.prompt.remaining(), 0);
    }

    #[test]
    fn menu_is_shown_every_iteration() {
        let mut h = Harness::new(&["4", "4", "8"]);
        h.session().run().unwrap();
        assert_eq!(h.output().matches("7. Decrypt and Run").count(), 3);
        assert_eq!(h.exec.steps(), vec!["backup", "backup"]);
    }

    #[test]
    fn init_choice_issues_single_init_command() {
        let mut h = Harness::new(&["1", "8"]);
        h.session().run().unwrap();
        assert_eq!(h.exec.calls, vec![vec![
            "tool", "init", "-e", "vault", "/backups"
        ]]);
    }

    #[test]
    fn delete_choice_with_no_leaves_files() {
        let mut h = Harness::new(&["6", "no", "8"]);
        h.session().run().unwrap();
        assert_eq!(h.file_count(), 1);
        assert!(h.output().contains("Deletion cancelled."));
    }

    #[test]
    fn decrypt_choice_runs_commands_in_order() {
        let mut h = Harness::new(&["3", "42", "8"]);
        h.session().run().unwrap();
        assert_eq!(h.exec.calls, vec![
            vec!["tool", "init", "-e", "vault", "/backups"],
            vec!["tool", "list"],
            vec!["tool", "restore", "-r", "42", "-overwrite"],
        ]);
    }

    #[test]
    fn session_survives_failing_workflows() {
        let mut h = Harness::new(&["4", "6", "maybe", "8"]).with_exec(
            crate::ui::RecordingExecutor::new().exit_code("backup", 1),
        );
        h.session().run().unwrap();
        assert!(h.output().contains("Failed to encrypt."));
        assert!(h.output().contains("Deletion cancelled."));
        assert_eq!(h.prompt.remaining(), 0);
    }

    // ── marker warning ────────────────────────────────────────────────────────

    #[test]
    fn marker_present_triggers_warning() {
        let mut h = Harness::new(&["8"]);
        fs::create_dir(h.cfg.repository.join(".duplicacy")).unwrap();
        h.session().run().unwrap();
        assert!(h.output().contains("WARNING: The .duplicacy file is present."));
    }

    #[test]
    fn no_marker_no_warning() {
        let mut h = Harness::new(&["8"]);
        h.session().run().unwrap();
        assert!(!h.output().contains("WARNING"));
    }
}
