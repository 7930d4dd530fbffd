//! Result type for the command line layer.
//!
//! The library surfaces typed errors ([`CommitError`](crate::error::CommitError),
//! [`ApiError`](crate::error::ApiError)); commands and configuration loading
//! wrap them in `color-eyre` reports so the binary can print them with
//! context.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! fn load() -> Result<Config> {
//!     let content = std::fs::read_to_string("multicommit.toml")
//!         .wrap_err("Failed to read configuration file")?;
//!     Ok(toml::from_str(&content)?)
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used by the CLI, a `color_eyre::eyre::Result<T>`.
pub type Result<T> = EyreResult<T>;
