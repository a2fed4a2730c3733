//! Command argument construction helpers.
//!
//! This module is responsible for *building* the argument vectors passed to
//! the backup tool.  It deliberately does **not** execute anything; process
//! execution lives in [`crate::ui`].
//!
//! Every builder returns a complete `Vec<String>` (program first).  Nothing is
//! ever joined into a shell string, so revision numbers typed by the user and
//! paths containing spaces reach the tool as single, uninterpreted arguments.

use crate::config::{Config, SecondaryStorage};

/// Storage name the backup tool gives the storage created by `init`.
const PRIMARY_STORAGE_NAME: &str = "default";

/// `<tool> <subcommand>`, the prefix of every backup-tool invocation.
fn tool_base(cfg: &Config, subcommand: &str) -> Vec<String> {
    vec![cfg.tool.clone(), subcommand.into()]
}

/// `<tool> init -e <id> <storage>`
pub fn build_init_args(cfg: &Config) -> Vec<String> {
    let mut cmd = tool_base(cfg, "init");
    cmd.extend(["-e".into(), cfg.storage_id.clone(), cfg.storage.clone()]);
    cmd
}

/// `<tool> backup -threads <n>`
pub fn build_backup_args(cfg: &Config) -> Vec<String> {
    let mut cmd = tool_base(cfg, "backup");
    cmd.extend(["-threads".into(), cfg.threads.to_string()]);
    cmd
}

/// `<tool> list`
pub fn build_list_args(cfg: &Config) -> Vec<String> {
    tool_base(cfg, "list")
}

/// `<tool> restore -r <revision> -overwrite`
pub fn build_restore_args(cfg: &Config, revision: &str) -> Vec<String> {
    let mut cmd = tool_base(cfg, "restore");
    cmd.extend(["-r".into(), revision.into(), "-overwrite".into()]);
    cmd
}

/// `<tool> add -e -copy default <secondary id> <id> <secondary location>`
///
/// Registers the secondary storage as copy-compatible with the primary one so
/// that [`build_copy_args`] can transfer snapshots between them.
pub fn build_add_args(cfg: &Config, secondary: &SecondaryStorage) -> Vec<String> {
    let mut cmd = tool_base(cfg, "add");
    cmd.extend([
        "-e".into(),
        "-copy".into(),
        PRIMARY_STORAGE_NAME.into(),
        secondary.id.clone(),
        cfg.storage_id.clone(),
        secondary.location.clone(),
    ]);
    cmd
}

/// `<tool> copy -from default -to <secondary id> -threads <n>`
pub fn build_copy_args(cfg: &Config, secondary: &SecondaryStorage) -> Vec<String> {
    let mut cmd = tool_base(cfg, "copy");
    cmd.extend([
        "-from".into(),
        PRIMARY_STORAGE_NAME.into(),
        "-to".into(),
        secondary.id.clone(),
        "-threads".into(),
        cfg.threads.to_string(),
    ]);
    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────────
