//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mdweb markdown site server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory holding *.md, templates/, errors/ and static/
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the site root (default: mdweb.toml)
    #[arg(short = 'C', long, default_value = "mdweb.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the site, reloading templates from disk periodically
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// Also serve static/* without the /static prefix
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        alias_static: Option<bool>,

        /// Seconds between template reloads
        #[arg(long = "interval")]
        reload_interval: Option<u64>,
    },

    /// Load every template collection once and report errors
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "mdweb", "-r", "site", "serve", "-p", "9000", "--alias-static", "--interval", "3",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.config, PathBuf::from("mdweb.toml"));
        match cli.command {
            Commands::Serve {
                interface,
                port,
                alias_static,
                reload_interval,
            } => {
                assert_eq!(interface, None);
                assert_eq!(port, Some(9000));
                assert_eq!(alias_static, Some(true));
                assert_eq!(reload_interval, Some(3));
            }
            Commands::Check => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["mdweb", "-C", "other.toml", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
