//! Confirmation-gated deletion of the repository contents.
//!
//! This is the only place that destroys local data.  Nothing is touched until
//! the operator has typed `yes` (any case) in answer to a prompt that names
//! the exact directory.  Afterwards the directory itself still exists, empty,
//! with its original permissions, ready for the next restore.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use console::style;
use thiserror::Error;

use crate::{
    prompt::Prompt,
    ui::{icon_err, icon_ok, make_spinner},
};

/// What happened when deletion was requested.
#[derive(Debug, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    Cancelled,
    Failed(String),
}

/// Filesystem failures while clearing the directory.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("refusing to delete relative path {}", .0.display())]
    RelativePath(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("reading permissions of {}: {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("removing {}: {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("recreating {}: {source}", .path.display())]
    Recreate { path: PathBuf, source: io::Error },
}

/// Ask before deleting everything in `path`, then clear and recreate it.
///
/// Returns `Err` only when the prompt or `out` fail; filesystem problems come
/// back as [`DeletionOutcome::Failed`] after being printed.
pub fn confirm_and_delete(
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
    path: &Path,
) -> io::Result<DeletionOutcome> {
    if !path.is_absolute() {
        let err = GuardError::RelativePath(path.to_path_buf());
        writeln!(out, "  {}  {err}", icon_err())?;
        return Ok(DeletionOutcome::Failed(err.to_string()));
    }

    let question = format!(
        "Are you sure you want to delete all files in {}? (yes/no): ",
        path.display()
    );
    let answer = prompt.ask(&question)?;
    if !is_affirmative(answer.as_deref()) {
        writeln!(out, "Deletion cancelled.")?;
        return Ok(DeletionOutcome::Cancelled);
    }

    let spinner = make_spinner(&format!("Deleting {}", path.display()));
    let result = clear_directory(path);
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            log::info!("cleared {}", path.display());
            writeln!(
                out,
                "  {}  {} {}",
                icon_ok(),
                style("Successfully deleted all files in:").bold(),
                path.display()
            )?;
            Ok(DeletionOutcome::Deleted)
        },
        Err(e) => {
            log::info!("deletion of {} failed: {e}", path.display());
            writeln!(
                out,
                "  {}  {} {}: {e}",
                icon_err(),
                style("An error occurred while deleting files in").bold(),
                path.display()
            )?;
            Ok(DeletionOutcome::Failed(e.to_string()))
        },
    }
}

/// Only a literal `yes`, ignoring case and surrounding whitespace, confirms.
fn is_affirmative(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("yes"))
}

/// Remove `path` recursively and recreate it empty with the same permissions.
fn clear_directory(path: &Path) -> Result<(), GuardError> {
    let meta = fs::metadata(path).map_err(|source| GuardError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(GuardError::NotADirectory(path.to_path_buf()));
    }
    let permissions = meta.permissions();

    fs::remove_dir_all(path).map_err(|source| GuardError::Remove {
        path: path.to_path_buf(),
        source,
    })?;

    let recreate = |source| GuardError::Recreate {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(path).map_err(recreate)?;
    fs::set_permissions(path, permissions).map_err(recreate)?;
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
