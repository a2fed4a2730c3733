//! Decrypt and Run: the full "use the files, then lock them away" cycle.
//!
//! | # | Step                | Runs when                                |
//! |---|---------------------|------------------------------------------|
//! | 1 | init, list, restore | always (see [`super::restore`])          |
//! | 2 | external program    | a program is configured and 1 restored   |
//! | 3 | backup              | 2 succeeded or no program is configured  |
//! | 4 | add, then copy      | 3 succeeded and secondary storage is set |
//! | 5 | delete (guarded)    | 3 succeeded                              |
//!
//! Any failure up to and including the backup ends the workflow and leaves
//! the decrypted files in place.  A secondary-storage failure does not block
//! deletion because the primary backup already holds the data.  A failed
//! `add` does not skip `copy` either: the tool refuses to add a storage name
//! that is already registered, and `copy` fails by itself when it is not.

use std::{io, io::Write, path::Path};

use crate::{
    commands::{restore, storage},
    config::SecondaryStorage,
    runner::{build_add_args, build_copy_args},
    session::Session,
    ui::icon_err,
};

pub fn decrypt_and_run(s: &mut Session<'_>) -> io::Result<()> {
    let cfg = s.cfg;

    if !restore::decrypt_steps(s)? {
        return s.skipped("Decryption did not complete; nothing was run or re-encrypted.");
    }

    if let Some(program) = &cfg.program {
        if !is_executable(program) {
            writeln!(
                s.out,
                "  {}  The program at {} does not exist or is not executable. Skipping program execution.",
                icon_err(),
                program.display()
            )?;
            return Ok(());
        }

        writeln!(s.out, "Running external program: {}", program.display())?;
        let argv = vec![program.to_string_lossy().into_owned()];
        let ran = s.command(&argv, "External program finished.", "Failed to run the program.")?;
        if !ran.success() {
            return s.skipped("Files were left decrypted; encrypt and delete them when done.");
        }
        writeln!(s.out, "Encrypting and deleting files after program execution...")?;
    }

    let backed_up = storage::backup(s, "Encryption successful.", "Failed to encrypt.")?;
    if !backed_up.success() {
        return s.skipped("Backup failed; local files were not deleted.");
    }

    if let Some(secondary) = &cfg.secondary {
        copy_to_secondary(s, secondary)?;
    }

    s.delete_repository()?;
    Ok(())
}

/// `add` the secondary storage, then `copy` the new backup into it.
///
/// The `add` result is only reported; a storage registered by an earlier
/// cycle makes it fail while `copy` still works.
fn copy_to_secondary(s: &mut Session<'_>, secondary: &SecondaryStorage) -> io::Result<()> {
    let argv = build_add_args(s.cfg, secondary);
    s.command(
        &argv,
        "Secondary storage added.",
        "Failed to add secondary storage (it may already be registered).",
    )?;

    let argv = build_copy_args(s.cfg, secondary);
    s.command(
        &argv,
        "Backup copied to secondary storage.",
        "Failed to copy backup to secondary storage.",
    )?;
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
