//! `packrat config` — write and inspect `~/.packrat/config.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use packrat_core::config::{self as core_config, Config};
use packrat_core::types::{FolderName, RetentionCount};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a starter config file.
    Init {
        /// Local directory to back up / sync.
        #[arg(long)]
        source: PathBuf,

        /// Remote target folder name.
        #[arg(long)]
        folder: String,

        /// How many archives to retain remotely.
        #[arg(long, value_name = "N")]
        keep: Option<RetentionCount>,

        /// API token (omit to use $PACKRAT_TOKEN at run time).
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the current config (token masked).
    Show,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init {
            source,
            folder,
            keep,
            token,
        } => init(source, folder, keep, token),
        ConfigCommand::Show => show(),
    }
}

fn init(
    source: PathBuf,
    folder: String,
    keep: Option<RetentionCount>,
    token: Option<String>,
) -> Result<()> {
    let config = Config {
        source_dir: source,
        folder: FolderName::from(folder),
        retention: keep.unwrap_or_default(),
        token,
    };
    core_config::save(&config).context("failed to write config file")?;
    let path = core_config::config_path()?;
    println!("{} wrote {}", "✓".green(), path.display());
    Ok(())
}

fn show() -> Result<()> {
    let mut config = core_config::load().context("failed to load config")?;
    if config.token.is_some() {
        config.token = Some("********".to_owned());
    }
    let yaml = serde_yaml::to_string(&config).context("failed to render config")?;
    print!("{yaml}");
    Ok(())
}
