//! `packrat prune` — run the retention pass on its own.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use packrat_core::types::RetentionCount;
use packrat_store::ObjectStore;
use packrat_sync::retention;

use crate::commands::{build_store, resolve_config};

/// Arguments for `packrat prune`.
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Remote target folder name (overrides the config file).
    #[arg(long)]
    pub folder: Option<String>,

    /// How many archives to retain remotely (overrides the config file).
    #[arg(long, value_name = "N")]
    pub keep: Option<RetentionCount>,
}

impl PruneArgs {
    pub fn run(self) -> Result<()> {
        let config = resolve_config(None, self.folder, self.keep)?;
        let store = build_store(&config)?;

        let Some(folder) = store
            .find_folder(&config.folder.0)
            .with_context(|| format!("failed to look up folder '{}'", config.folder))?
        else {
            println!("folder '{}' does not exist; nothing to prune", config.folder);
            return Ok(());
        };

        let deleted = retention::prune(&store, &folder, config.retention)
            .with_context(|| format!("prune of '{}' failed", config.folder))?;
        if deleted.is_empty() {
            println!(
                "  {}  at most {} archive(s) present — nothing to prune",
                "·".dimmed(),
                config.retention
            );
        } else {
            for file in &deleted {
                println!("  {}  pruned '{}'", "✗".red(), file.name);
            }
        }
        println!("{} prune complete", "✓".green());
        Ok(())
    }
}
