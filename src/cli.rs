//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main`, merged with
//! the optional TOML defaults into a [`crate::config::Config`], and never
//! consulted again.
//!
//! Every storage/program option is an `Option` so that "not given on the
//! command line" can be told apart from "given with the default value" when
//! layering over the config file.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name    = "ducryptacy",
    about   = "Use duplicacy to encrypt and decrypt sensitive files while keeping a running backup",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Directory to be encrypted.
    ///
    /// Must already exist.  It is resolved to an absolute path once at
    /// startup and every backup-tool invocation runs inside it.
    pub repository: PathBuf,

    /// Primary storage location for backups [default: ./duplicacy/].
    #[arg(long, value_name = "LOCATION")]
    pub storage: Option<String>,

    /// Identifier for the primary storage [default: duplicacy].
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Secondary storage location that backups are copied to.
    ///
    /// Must be given together with `--secondary-id`.
    #[arg(long, value_name = "LOCATION")]
    pub secondary_storage: Option<String>,

    /// Identifier for the secondary storage.
    #[arg(long, value_name = "ID")]
    pub secondary_id: Option<String>,

    /// Path to an external program to run after decryption.
    ///
    /// Only used by the "Decrypt and Run" workflow.  The program is started
    /// with no arguments inside the repository directory.
    #[arg(long, value_name = "PATH")]
    pub run_program: Option<PathBuf>,

    /// Number of threads the backup tool uses [default: 4].
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Backup tool executable [default: duplicacy].
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// TOML file with default values for the options above.
    ///
    /// Values given on the command line win over the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit without starting a session.
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ducryptacy").chain(extra.iter().copied()))
    }

    #[test]
    fn repository_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn options_default_to_none() {
        let cli = parse(&["/tmp/repo"]).unwrap();
        assert_eq!(cli.repository, PathBuf::from("/tmp/repo"));
        assert!(cli.storage.is_none());
        assert!(cli.id.is_none());
        assert!(cli.threads.is_none());
        assert!(cli.run_program.is_none());
        assert!(!cli.print_config);
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(parse(&["/tmp/repo", "--threads", "0"]).is_err());
    }

    #[test]
    fn all_flags_parse() {
        let cli = parse(&[
            "/tmp/repo",
            "--storage",
            "/backups",
            "--id",
            "vault",
            "--secondary-storage",
            "sftp://nas/backups",
            "--secondary-id",
            "offsite",
            "--run-program",
            "/usr/bin/true",
            "--threads",
            "8",
            "--tool",
            "/opt/duplicacy",
        ])
        .unwrap();
        assert_eq!(cli.storage.as_deref(), Some("/backups"));
        assert_eq!(cli.id.as_deref(), Some("vault"));
        assert_eq!(cli.secondary_storage.as_deref(), Some("sftp://nas/backups"));
        assert_eq!(cli.secondary_id.as_deref(), Some("offsite"));
        assert_eq!(cli.threads, Some(8));
        assert_eq!(cli.tool.as_deref(), Some("/opt/duplicacy"));
    }
}
