//! Init, Encrypt, Encrypt and Delete, Delete.

use std::io;

use crate::{
    runner::{build_backup_args, build_init_args},
    session::Session,
    ui::CommandResult,
};

/// `init` the primary storage.
pub fn init(s: &mut Session<'_>) -> io::Result<()> {
    let argv = build_init_args(s.cfg);
    s.command(
        &argv,
        "Storage initialized successfully.",
        "Failed to initialize storage.",
    )?;
    Ok(())
}

/// Snapshot the repository into the primary storage.
pub fn backup(s: &mut Session<'_>, on_success: &str, on_failure: &str) -> io::Result<CommandResult> {
    let argv = build_backup_args(s.cfg);
    s.command(&argv, on_success, on_failure)
}

pub fn encrypt(s: &mut Session<'_>) -> io::Result<()> {
    backup(s, "Encryption successful.", "Failed to encrypt.")?;
    Ok(())
}

/// Back up, then offer to delete the local files.
///
/// The deletion prompt only appears after a successful backup.
pub fn encrypt_and_delete(s: &mut Session<'_>) -> io::Result<()> {
    let backed_up = backup(s, "Backup successful.", "Failed to create backup.")?;
    if !backed_up.success() {
        return s.skipped("Backup failed; local files were not deleted.");
    }
    s.delete_repository()?;
    Ok(())
}

pub fn delete(s: &mut Session<'_>) -> io::Result<()> {
    s.delete_repository()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::harness::Harness, ui::RecordingExecutor};

    #[test]
    fn init_issues_exactly_one_init_command() {
        let mut h = Harness::new(&[]);
        init(&mut h.session()).unwrap();
        assert_eq!(h.exec.calls, vec![vec![
            "tool", "init", "-e", "vault", "/backups"
        ]]);
        assert!(h.output().contains("Storage initialized successfully."));
    }

    #[test]
    fn init_failure_is_reported() {
        let mut h = Harness::new(&[]).with_exec(RecordingExecutor::new().exit_code("init", 1));
        init(&mut h.session()).unwrap();
        assert!(h.output().contains("Failed to initialize storage."));
    }

    #[test]
    fn encrypt_forwards_thread_count() {
        let mut h = Harness::new(&[]);
        h.cfg.threads = 12;
        encrypt(&mut h.session()).unwrap();
        assert_eq!(h.exec.calls, vec![vec!["tool", "backup", "-threads", "12"]]);
        assert!(h.prompt.asked.is_empty());
    }

    #[test]
    fn encrypt_and_delete_clears_repository_after_backup() {
        let mut h = Harness::new(&["yes"]);
        encrypt_and_delete(&mut h.session()).unwrap();
        assert_eq!(h.exec.steps(), vec!["backup"]);
        assert!(h.asked_to_delete());
        assert!(h.cfg.repository.is_dir());
        assert_eq!(h.file_count(), 0);
    }

    #[test]
    fn encrypt_and_delete_keeps_files_when_backup_fails() {
        let mut h = Harness::new(&["yes"]).with_exec(RecordingExecutor::new().exit_code("backup", 2));
        encrypt_and_delete(&mut h.session()).unwrap();
        assert!(!h.asked_to_delete());
        assert_eq!(h.file_count(), 1);
        assert!(h.output().contains("local files were not deleted"));
    }

    #[test]
    fn encrypt_and_delete_respects_cancellation() {
        let mut h = Harness::new(&["no"]);
        encrypt_and_delete(&mut h.session()).unwrap();
        assert!(h.asked_to_delete());
        assert_eq!(h.file_count(), 1);
    }

    #[test]
    fn delete_runs_no_commands() {
        let mut h = Harness::new(&["no"]);
        delete(&mut h.session()).unwrap();
        assert!(h.exec.calls.is_empty());
        assert_eq!(h.file_count(), 1);
    }

    #[test]
    fn delete_confirmed_empties_repository() {
        let mut h = Harness::new(&["YES"]);
        delete(&mut h.session()).unwrap();
        assert_eq!(h.file_count(), 0);
    }
}
