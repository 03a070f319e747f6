//! Session configuration
//!
//! Built from defaults, then `REPO_EXTRACT_*` environment variables, then
//! command-line arguments. No configuration file is read.

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `REPO_EXTRACT_OUTPUT`.
pub const ENV_PREFIX: &str = "REPO_EXTRACT_";

/// Default output sink name
pub const DEFAULT_OUTPUT: &str = "output.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote repository location to clone or update
    #[serde(default)]
    pub repo_url: Option<String>,

    /// File the selected blocks are appended to
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Parent directory for the local working copy (current directory if unset)
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Offer the `.git` metadata directory for selection
    #[serde(default)]
    pub include_git_dir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { repo_url: None, output: default_output(), workdir: None, include_git_dir: false }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

impl Config {
    /// Repository location, rejecting a missing or blank value.
    pub fn repo_url(&self) -> Result<&str> {
        match self.repo_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => anyhow::bail!("A repository location must be specified"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.repo_url()?;
        if self.output.as_os_str().is_empty() {
            anyhow::bail!("Output file name must not be empty");
        }
        Ok(())
    }
}

/// Load defaults layered with environment overrides.
pub fn load_config() -> Result<Config> {
    load_from(Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX)))
}

fn load_from(figment: Figment) -> Result<Config> {
    figment.extract().context("Invalid configuration in environment")
}
