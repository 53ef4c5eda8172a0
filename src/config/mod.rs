//! Site configuration management for `mdweb.toml`.
//!
//! The file is optional and lives in the site root. CLI flags override it.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[serve]`   | Listener, static aliasing, reload interval       |
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "0.0.0.0"
//! port = 8080
//! alias_static = true
//! reload_interval = 10
//! ```

pub mod defaults;
mod error;
mod serve;

pub use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
    time::Duration,
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing mdweb.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute site root (set from the CLI)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Resolve the site root, read the config file if present, apply CLI
    /// overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = Self::expand_root(cli.root.as_deref().unwrap_or(Path::new("./")));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.root = Self::normalize_path(&root);
        config.config_path = Self::normalize_path(&config_path);
        config.update_with_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            alias_static,
            reload_interval,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.alias_static, alias_static.as_ref());
            Self::update_option(&mut self.serve.reload_interval, reload_interval.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Expand a leading `~` in the root path.
    fn expand_root(root: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&root.to_string_lossy()).into_owned())
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "site root `{}` is not a directory",
                self.root.display()
            )));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        if self.serve.reload_interval == 0 {
            return Err(ConfigError::Validation(
                "[serve.reload_interval] must be at least 1 second".into(),
            ));
        }

        Ok(())
    }

    pub const fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.serve.reload_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mdweb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_from_str_empty_is_default() {
        let config = SiteConfig::from_str("").unwrap();
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.reload_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SiteConfig::from_str("[serve\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();

        let config = SiteConfig::load(&cli(&["-r", root, "check"])).unwrap();
        assert_eq!(config.root, dir.path().canonicalize().unwrap());
        assert_eq!(config.serve.interface, "127.0.0.1");
    }

    #[test]
    fn test_load_file_then_cli_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("mdweb.toml"),
            "[serve]\nport = 3000\nreload_interval = 5\n",
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();

        let config = SiteConfig::load(&cli(&["-r", root, "serve", "--interval", "2"])).unwrap();
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.serve.reload_interval, 2);
        assert!(!config.serve.alias_static);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig {
            root: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_ok());

        config.serve.reload_interval = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.serve.reload_interval = 1;
        config.serve.interface = "localhost:80".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.serve.interface = "::1".into();
        config.root = dir.path().join("missing");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
