//! CLI subcommands and shared plumbing.

pub mod backup;
pub mod config;
pub mod prune;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use packrat_core::config::{self as core_config, Config};
use packrat_core::error::ConfigError;
use packrat_core::types::{FolderName, RetentionCount};
use packrat_store::DriveStore;
use packrat_sync::RunReport;

/// Resolve the effective config: the YAML file overlaid with CLI flags.
///
/// A missing config file is fine when `--source` and `--folder` fully
/// specify the run.
pub(crate) fn resolve_config(
    source: Option<PathBuf>,
    folder: Option<String>,
    keep: Option<RetentionCount>,
) -> Result<Config> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let mut config = match core_config::load_at(&home) {
        Ok(config) => config,
        Err(err @ ConfigError::ConfigNotFound { .. }) => match (&source, &folder) {
            (Some(source_dir), Some(folder_name)) => Config {
                source_dir: source_dir.clone(),
                folder: FolderName::from(folder_name.as_str()),
                retention: RetentionCount::default(),
                token: None,
            },
            _ => {
                return Err(err)
                    .context("pass --source and --folder or run `packrat config init`");
            }
        },
        Err(err) => return Err(err).context("failed to load config"),
    };

    if let Some(source_dir) = source {
        config.source_dir = source_dir;
    }
    if let Some(folder_name) = folder {
        config.folder = FolderName::from(folder_name);
    }
    if let Some(retention) = keep {
        config.retention = retention;
    }
    Ok(config)
}

/// Build the Drive client from the resolved config.
pub(crate) fn build_store(config: &Config) -> Result<DriveStore> {
    let token = config.resolve_token()?;
    Ok(DriveStore::new(token))
}

/// Print a run summary in the shared glyph style.
pub(crate) fn print_report(report: &RunReport) {
    if let Some(name) = &report.restored_from {
        println!("  {}  restored from '{name}'", "⤓".cyan());
    }
    match &report.published {
        Some(name) => println!("  {}  published '{name}'", "✎".green()),
        None => println!("  {}  unchanged — nothing published", "·".dimmed()),
    }
    for name in &report.pruned {
        println!("  {}  pruned '{name}'", "✗".red());
    }
    if let Some(fp) = &report.fingerprint {
        let short: String = fp.0.chars().take(12).collect();
        println!("  fingerprint {short}…");
    }
    println!("{} {} complete", "✓".green(), report.mode);
}
