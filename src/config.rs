//! Configuration types and loading logic.
//!
//! Configuration comes from up to three layers, merged per field with later
//! layers winning:
//!
//! 1. `~/.config/ducryptacy/config.toml`: global defaults, silently skipped when absent
//! 2. `--config <path>`: an explicit defaults file, which must exist
//! 3. command-line flags
//!
//! The merged [`PartialConfig`] is then [resolved](PartialConfig::resolve)
//! into an immutable [`Config`] exactly once, before the session starts.
//!
//! # File format
//!
//! ```toml
//! storage = "/mnt/backups/duplicacy"
//! id      = "vault"
//! threads = 8
//! tool    = "duplicacy"
//! program = "/usr/local/bin/keepassxc"
//!
//! [secondary]
//! location = "sftp://nas.lan/backups"
//! id       = "offsite"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::Cli;

// ─── Resolved config ─────────────────────────────────────────────────────────

/// Fully resolved, immutable session configuration.
///
/// Built once in `main` and shared by reference with every workflow.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the directory being protected.
    pub repository: PathBuf,

    /// Backup tool executable.
    pub tool: String,

    /// Primary storage location; local paths are absolute, URLs untouched.
    pub storage: String,

    /// Primary storage identifier passed to `init -e`.
    pub storage_id: String,

    /// Optional secondary storage that backups are copied to.
    pub secondary: Option<SecondaryStorage>,

    /// Optional program run by "Decrypt and Run", as an absolute path.
    pub program: Option<PathBuf>,

    /// Thread count forwarded to the backup tool.  Always `>= 1`.
    pub threads: u32,
}

/// Location and identifier of the secondary storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryStorage {
    pub location: String,
    pub id: String,
}

impl Config {
    /// Sentinel directory the backup tool leaves behind in an initialised,
    /// unencrypted working copy.
    pub fn marker_path(&self) -> PathBuf {
        self.repository.join(MARKER_NAME)
    }
}

/// Name of the backup tool's metadata directory inside the repository.
pub const MARKER_NAME: &str = ".duplicacy";

// ─── Defaults ─────────────────────────────────────────────────────────────────

pub fn default_storage() -> String {
    "./duplicacy/".into()
}

pub fn default_storage_id() -> String {
    "duplicacy".into()
}

pub fn default_tool() -> String {
    "duplicacy".into()
}

pub const fn default_threads() -> u32 {
    4
}

// ─── Partial config ──────────────────────────────────────────────────────────

/// One configuration layer.  Every field is optional; `None` means "defer to
/// the layer below".
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub storage: Option<String>,
    pub id: Option<String>,
    pub threads: Option<u32>,
    pub tool: Option<String>,
    pub program: Option<PathBuf>,
    pub secondary: Option<PartialSecondary>,
}

/// `[secondary]` table.  Both halves are merged independently so a global
/// file can hold the location while a flag supplies the id.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSecondary {
    pub location: Option<String>,
    pub id: Option<String>,
}

impl PartialConfig {
    /// The layer described by command-line flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let secondary = if cli.secondary_storage.is_some() || cli.secondary_id.is_some() {
            Some(PartialSecondary {
                location: cli.secondary_storage.clone(),
                id: cli.secondary_id.clone(),
            })
        } else {
            None
        };

        Self {
            storage: cli.storage.clone(),
            id: cli.id.clone(),
            threads: cli.threads,
            tool: cli.tool.clone(),
            program: cli.run_program.clone(),
            secondary,
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let secondary = match (self.secondary, other.secondary) {
            (Some(base), Some(over)) => Some(PartialSecondary {
                location: over.location.or(base.location),
                id: over.id.or(base.id),
            }),
            (base, over) => over.or(base),
        };

        Self {
            storage: other.storage.or(self.storage),
            id: other.id.or(self.id),
            threads: other.threads.or(self.threads),
            tool: other.tool.or(self.tool),
            program: other.program.or(self.program),
            secondary,
        }
    }

    /// Apply defaults, validate, and make paths absolute.
    ///
    /// Fails if `repository` does not exist or is not a directory, if the
    /// thread count is zero, or if only half of the secondary storage is set.
    pub fn resolve(self, repository: &Path) -> Result<Config> {
        let repository = std::fs::canonicalize(repository)
            .with_context(|| format!("resolving repository {}", repository.display()))?;
        if !repository.is_dir() {
            bail!("repository {} is not a directory", repository.display());
        }

        let threads = self.threads.unwrap_or_else(default_threads);
        if threads == 0 {
            bail!("threads must be a positive integer");
        }

        let secondary = match self.secondary {
            None | Some(PartialSecondary { location: None, id: None }) => None,
            Some(PartialSecondary {
                location: Some(location),
                id: Some(id),
            }) => Some(SecondaryStorage {
                location: absolute_location(&location)?,
                id,
            }),
            Some(_) => bail!("secondary storage needs both a location and an id"),
        };

        let program = self
            .program
            .map(|p| {
                std::path::absolute(&p).with_context(|| format!("resolving program {}", p.display()))
            })
            .transpose()?;

        Ok(Config {
            repository,
            tool: self.tool.unwrap_or_else(default_tool),
            storage: absolute_location(&self.storage.unwrap_or_else(default_storage))?,
            storage_id: self.id.unwrap_or_else(default_storage_id),
            secondary,
            program,
            threads,
        })
    }
}

/// Make a local storage path absolute; leave `scheme://` URLs alone.
fn absolute_location(location: &str) -> Result<String> {
    if location.contains("://") {
        return Ok(location.to_string());
    }
    let abs = std::path::absolute(location)
        .with_context(|| format!("resolving storage location {location}"))?;
    Ok(abs.to_string_lossy().into_owned())
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Read one config layer from `path`.
///
/// Returns `Ok(None)` when the file does not exist, and an error when it exists
/// but cannot be read or is not valid TOML.
pub fn parse_partial(path: &Path) -> Result<Option<PartialConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text)
        .map(Some)
        .with_context(|| format!("parsing {}", path.display()))
}

/// Location of the global defaults file, if the platform has a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|d| d.join("ducryptacy").join("config.toml"))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
