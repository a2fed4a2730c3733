//! `ducryptacy`: keep sensitive files decrypted only while you use them.
//!
//! # Overview
//!
//! This binary is an interactive wrapper around
//! [`duplicacy`](https://duplicacy.com).  It keeps a directory of sensitive
//! files backed up to encrypted storage and makes the round trip (restore a
//! revision, work with the files, back them up again, wipe the local copy) a
//! matter of picking a menu entry.
//!
//! # Usage
//!
//! ```text
//! ducryptacy ~/vault                                  # defaults: ./duplicacy/, id "duplicacy"
//! ducryptacy ~/vault --storage /mnt/nas/vault --id vault --threads 8
//! ducryptacy ~/vault --run-program /usr/bin/keepassxc # enables "Decrypt and Run"
//! ducryptacy ~/vault --print-config                   # show resolved config and exit
//! RUST_LOG=debug ducryptacy ~/vault                   # log every spawned command
//! ```
//!
//! # Module layout
//!
//! | Module                       | Responsibility                               |
//! |------------------------------|----------------------------------------------|
//! | [`cli`]                      | Argument types parsed by clap                |
//! | [`config`]                   | Config layers, merging, startup validation   |
//! | [`runner`]                   | Backup-tool argument vectors                 |
//! | [`ui`]                       | Command execution and verdict output         |
//! | [`prompt`]                   | Line input (stdin or scripted)               |
//! | [`guard`]                    | Confirmation-gated repository deletion       |
//! | [`session`]                  | Menu loop and choice parsing                 |
//! | [`commands`]                 | One procedure per menu entry                 |

mod cli;
mod commands;
mod config;
mod guard;
mod prompt;
mod runner;
mod session;
mod ui;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{Config, PartialConfig, global_config_path, parse_partial};
use prompt::StdinPrompt;
use session::Session;
use ui::SystemExecutor;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let cfg = load_merged_config(&cli)?;

    if cli.print_config {
        println!("{cfg:#?}");
        return Ok(());
    }

    log::info!(
        "session on {} (storage {} as {})",
        cfg.repository.display(),
        cfg.storage,
        cfg.storage_id
    );

    let mut exec = SystemExecutor::new(&cfg.repository);
    let mut prompt = StdinPrompt::new();
    let mut stdout = io::stdout();
    let mut session = Session {
        cfg: &cfg,
        exec: &mut exec,
        prompt: &mut prompt,
        out: &mut stdout,
    };
    session.run().context("terminal I/O failed")?;

    Ok(())
}

/// Merge the config layers and resolve them against the repository argument.
///
/// 1. `~/.config/ducryptacy/config.toml`: skipped when absent or unreadable
/// 2. `--config <path>`: must exist and parse
/// 3. command-line flags
fn load_merged_config(cli: &Cli) -> Result<Config> {
    let global = global_config_path()
        .and_then(|p| match parse_partial(&p) {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("ignoring global config: {e:#}");
                None
            },
        })
        .unwrap_or_default();

    let explicit = match &cli.config {
        Some(path) => parse_partial(path)?
            .with_context(|| format!("config file {} not found", path.display()))?,
        None => PartialConfig::default(),
    };

    global
        .merge(explicit)
        .merge(PartialConfig::from_cli(cli))
        .resolve(&cli.repository)
}
