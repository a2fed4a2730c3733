//! Decrypt and Restore.
//!
//! Both end with the same list → pick a revision → restore sequence; Decrypt
//! runs `init` first so the repository is connected to the storage.

use std::io;

use crate::{
    runner::{build_init_args, build_list_args, build_restore_args},
    session::Session,
};

/// `init`, then [`list_and_restore`].  Returns whether a restore succeeded.
///
/// A failed `init` is reported but does not stop the sequence, since the tool
/// also refuses to `init` a repository that is already initialised.
pub fn decrypt_steps(s: &mut Session<'_>) -> io::Result<bool> {
    let argv = build_init_args(s.cfg);
    s.command(
        &argv,
        "Repository initialized successfully.",
        "Failed to initialize repository.",
    )?;
    list_and_restore(s)
}

/// `list`; on success ask for a revision and `restore` it.
///
/// Returns whether a restore ran and succeeded.
pub fn list_and_restore(s: &mut Session<'_>) -> io::Result<bool> {
    let argv = build_list_args(s.cfg);
    let listed = s.command(
        &argv,
        "Revisions listed successfully.",
        "Failed to list revisions.",
    )?;
    if !listed.success() {
        s.skipped("Restore skipped: revisions could not be listed.")?;
        return Ok(false);
    }

    let answer = s.prompt.ask("Enter the revision number to restore: ")?;
    let revision = answer.as_deref().map(str::trim).unwrap_or_default();
    if revision.is_empty() {
        s.skipped("Restore skipped: no revision entered.")?;
        return Ok(false);
    }
    if revision.contains(char::REPLACEMENT_CHARACTER) {
        s.skipped("Restore skipped: the revision was not readable text.")?;
        return Ok(false);
    }

    let argv = build_restore_args(s.cfg, revision);
    let restored = s.command(&argv, "Successfully restored", "Failed to restore.")?;
    Ok(restored.success())
}

pub fn decrypt(s: &mut Session<'_>) -> io::Result<()> {
    decrypt_steps(s)?;
    Ok(())
}

pub fn restore(s: &mut Session<'_>) -> io::Result<()> {
    list_and_restore(s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::harness::Harness, ui::RecordingExecutor};

    #[test]
    fn decrypt_runs_init_list_restore_in_order() {
        let mut h = Harness::new(&["42"]);
        decrypt(&mut h.session()).unwrap();
        assert_eq!(h.exec.calls, vec![
            vec!["tool", "init", "-e", "vault", "/backups"],
            vec!["tool", "list"],
            vec!["tool", "restore", "-r", "42", "-overwrite"],
        ]);
        assert!(h.output().contains("Successfully restored"));
    }

    #[test]
    fn failed_list_skips_prompt_and_restore() {
        let mut h = Harness::new(&["42"]).with_exec(RecordingExecutor::new().exit_code("list", 1));
        decrypt(&mut h.session()).unwrap();
        assert_eq!(h.exec.steps(), vec!["init", "list"]);
        assert!(!h.asked_for_revision());
        assert_eq!(h.prompt.remaining(), 1);
    }

    #[test]
    fn failed_init_still_lists_and_restores() {
        let mut h = Harness::new(&["7"]).with_exec(RecordingExecutor::new().exit_code("init", 100));
        let restored = decrypt_steps(&mut h.session()).unwrap();
        assert!(restored);
        assert_eq!(h.exec.steps(), vec!["init", "list", "restore"]);
        assert!(h.output().contains("Failed to initialize repository."));
    }

    #[test]
    fn restore_skips_init() {
        let mut h = Harness::new(&["3"]);
        restore(&mut h.session()).unwrap();
        assert_eq!(h.exec.steps(), vec!["list", "restore"]);
    }

    #[test]
    fn revision_is_trimmed() {
        let mut h = Harness::new(&["  5 "]);
        restore(&mut h.session()).unwrap();
        assert_eq!(h.exec.calls[1], vec!["tool", "restore", "-r", "5", "-overwrite"]);
    }

    #[test]
    fn blank_revision_skips_restore() {
        let mut h = Harness::new(&[""]);
        let restored = list_and_restore(&mut h.session()).unwrap();
        assert!(!restored);
        assert_eq!(h.exec.steps(), vec!["list"]);
        assert!(h.output().contains("no revision entered"));
    }

    #[test]
    fn undecodable_revision_skips_restore() {
        let mut h = Harness::new(&["4\u{fffd}"]);
        assert!(!list_and_restore(&mut h.session()).unwrap());
        assert_eq!(h.exec.steps(), vec!["list"]);
        assert!(h.output().contains("not readable text"));
    }

    #[test]
    fn end_of_input_at_revision_prompt_skips_restore() {
        let mut h = Harness::new(&[]);
        assert!(!list_and_restore(&mut h.session()).unwrap());
        assert_eq!(h.exec.steps(), vec!["list"]);
    }

    #[test]
    fn failed_restore_is_reported() {
        let mut h = Harness::new(&["9"]).with_exec(RecordingExecutor::new().exit_code("restore", 1));
        assert!(!list_and_restore(&mut h.session()).unwrap());
        assert!(h.output().contains("Failed to restore."));
    }
}
