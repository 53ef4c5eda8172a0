//! mdweb - serve a directory of markdown templates as HTML.

mod cli;
mod config;
mod logger;
mod reload;
mod render;
mod serve;
mod site;
mod template;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use serve::serve_site;
use template::{
    CollectionKind,
    loader::{self, Reloaded},
    store::SnapshotStore,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => serve_site(&config),
        Commands::Check => check_site(&config),
    }
}

/// Load every collection once, as a cold start would, and report counts.
fn check_site(config: &SiteConfig) -> Result<()> {
    let store = SnapshotStore::new();
    for kind in CollectionKind::ALL {
        let reloaded = loader::reload(&store, kind, &config.root)
            .with_context(|| format!("Failed to load {kind} templates"))?;
        if let Reloaded::Published { templates } = reloaded {
            let names = store.current(kind)?.names().collect::<Vec<_>>().join(", ");
            log!("check"; "{kind}: {templates} templates ({names})");
        }
    }
    log!("check"; "{} is ready to serve", config.root.display());
    Ok(())
}
