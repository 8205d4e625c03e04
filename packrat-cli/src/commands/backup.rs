//! `packrat backup` — unconditional archive upload.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use packrat_core::types::{RetentionCount, RunMode};

use crate::commands::{build_store, print_report, resolve_config};

/// Arguments for `packrat backup`.
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Local directory to archive (overrides the config file).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Remote target folder name (overrides the config file).
    #[arg(long)]
    pub folder: Option<String>,

    /// How many archives to retain remotely (overrides the config file).
    #[arg(long, value_name = "N")]
    pub keep: Option<RetentionCount>,
}

impl BackupArgs {
    pub fn run(self) -> Result<()> {
        let config = resolve_config(self.source, self.folder, self.keep)?;
        let store = build_store(&config)?;
        let report = packrat_sync::run(&store, &config, RunMode::Backup)
            .with_context(|| format!("backup of {} failed", config.source_dir.display()))?;
        print_report(&report);
        Ok(())
    }
}
