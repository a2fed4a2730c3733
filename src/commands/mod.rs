//! Workflow handlers, one per menu entry.
//!
//! | File                 | Menu entries                              |
//! |----------------------|-------------------------------------------|
//! | `storage.rs`         | Init, Encrypt, Encrypt and Delete, Delete |
//! | `restore.rs`         | Decrypt, Restore                          |
//! | `decrypt_and_run.rs` | Decrypt and Run                           |
//!
//! Every workflow is a fixed, ordered script of steps.  Branching happens
//! only on the result of the step just before, and failed steps are printed
//! rather than returned; `Err` means the terminal itself failed.

pub mod decrypt_and_run;
pub mod restore;
pub mod storage;

use std::io;

use crate::session::{Session, WorkflowChoice};

/// A workflow procedure.
pub type Workflow = fn(&mut Session<'_>) -> io::Result<()>;

/// The procedure behind each menu entry.  `Exit` has none.
pub fn workflow(choice: WorkflowChoice) -> Option<Workflow> {
    match choice {
        WorkflowChoice::Init => Some(storage::init),
        WorkflowChoice::EncryptAndDelete => Some(storage::encrypt_and_delete),
        WorkflowChoice::Decrypt => Some(restore::decrypt),
        WorkflowChoice::Encrypt => Some(storage::encrypt),
        WorkflowChoice::Restore => Some(restore::restore),
        WorkflowChoice::Delete => Some(storage::delete),
        WorkflowChoice::DecryptAndRun => Some(decrypt_and_run::decrypt_and_run),
        WorkflowChoice::Exit => None,
    }
}

/// Run the workflow for `choice` to completion.
pub fn dispatch(session: &mut Session<'_>, choice: WorkflowChoice) -> io::Result<()> {
    match workflow(choice) {
        Some(procedure) => procedure(session),
        None => Ok(()),
    }
}

// ─── Test harness ─────────────────────────────────────────────────────────────


// ─── Tests ────────────────────────────────────────────────────────────────────
