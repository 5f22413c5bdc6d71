//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` (`--config PATH`, or the platform config directory)
//! 3. `HASHSWEEP_*` environment variables
//! 4. Command-line flags ([`Config::merge_cli`])
//!
//! A missing configuration file is not an error. Unset `recursive` and
//! `action` mean the user is asked at run time.
//!
//! ```toml
//! min_size = 4096
//! recursive = true
//! action = "skip"
//! output = "json"
//! ```

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::actions::resolve::Policy;
use crate::cli::{ActionArg, Cli, OutputFormat};
use crate::scanner::{ScanMode, DEFAULT_MIN_SIZE};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "HASHSWEEP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum file size in bytes (inclusive).
    pub min_size: u64,
    /// Scan subdirectories; unset means ask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    /// Action on duplicates; unset means ask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionArg>,
    /// Format of the final summary.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            recursive: None,
            action: None,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or the default location.
    ///
    /// # Errors
    ///
    /// Fails when the file or an environment override cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::config_path(),
        };

        match &path {
            Some(p) if p.exists() => log::debug!("Loading configuration from {}", p.display()),
            Some(p) => log::debug!("No configuration file at {}", p.display()),
            None => log::debug!("No configuration directory available"),
        }

        Self::figment(path.as_deref())
            .extract()
            .context("Failed to load configuration")
    }

    /// The provider stack behind [`load`](Self::load).
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "hashsweep", "hashsweep")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded layers.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        if let Some(mode) = cli.scan_mode() {
            self.recursive = Some(mode.is_recursive());
        }
        if let Some(action) = cli.action {
            self.action = Some(action);
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
    }

    /// Configured scan mode, if any.
    #[must_use]
    pub fn scan_mode(&self) -> Option<ScanMode> {
        self.recursive.map(ScanMode::from_recursive)
    }

    /// Configured resolution policy, if any.
    #[must_use]
    pub fn policy(&self) -> Option<Policy> {
        self.action.map(Policy::from)
    }
}

/// Library-level scan parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directories to scan, in order.
    pub roots: Vec<PathBuf>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Minimum file size in bytes (inclusive).
    pub min_size: u64,
}

impl ScanConfig {
    /// Create scan parameters; an empty `roots` means the current directory.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, recursive: bool, min_size: u64) -> Self {
        let roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        };
        Self {
            roots,
            recursive,
            min_size,
        }
    }

    /// Walk mode for these parameters.
    #[must_use]
    pub fn mode(&self) -> ScanMode {
        ScanMode::from_recursive(self.recursive)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(Vec::new(), true, DEFAULT_MIN_SIZE)
    }
}
