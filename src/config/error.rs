//! Errors from reading and validating `mdweb.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Why a site configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `mdweb.toml` exists but could not be read.
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// Malformed TOML or an unknown `[serve]` key.
    #[error("invalid mdweb.toml")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but cannot be served with: missing site root,
    /// non-IP interface, zero reload interval.
    #[error("invalid site configuration: {0}")]
    Validation(String),
}
