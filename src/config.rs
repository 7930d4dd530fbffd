//! Configuration loading and parsing for `multicommit.toml` files.
use color_eyre::eyre::{Context, eyre};
use log::*;
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::{
    commit::{CommitOptions, DEFAULT_BLOB_CONCURRENCY},
    forge::github::DEFAULT_API_URL,
    result::Result,
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "multicommit.toml";

/// Root configuration structure for `multicommit.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)] // Use default for missing fields
pub struct Config {
    /// API root of the GitHub instance (GitHub Enterprise uses
    /// `https://<host>/api/v3`).
    pub api_url: String,
    /// Force branch updates, discarding commits that landed after the
    /// branch was read (default: false)
    pub force: bool,
    /// Number of blob uploads in flight at once.
    pub blob_concurrency: usize,
    /// How many times to rerun a commit whose branch moved underneath it.
    pub conflict_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            force: false,
            blob_concurrency: DEFAULT_BLOB_CONCURRENCY,
            conflict_retries: 0,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] in the
    /// working directory when present. Missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("no configuration found: using default");
                    return Ok(Self::default());
                }
                default
            }
        };

        info!("loading configuration from {}", file.display());

        let content = std::fs::read_to_string(file).wrap_err_with(|| {
            format!("failed to read configuration file {}", file.display())
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .wrap_err("failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)
            .wrap_err_with(|| format!("invalid api_url: {}", self.api_url))?;

        if self.blob_concurrency == 0 {
            return Err(eyre!("blob_concurrency must be at least 1"));
        }

        Ok(())
    }

    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            force: self.force,
            blob_concurrency: self.blob_concurrency,
        }
    }
}
