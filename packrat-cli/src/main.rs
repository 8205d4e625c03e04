//! Packrat — scheduled folder backup/sync to a cloud drive folder.
//!
//! # Usage
//!
//! ```text
//! packrat backup [--source DIR] [--folder NAME] [--keep N]
//! packrat sync   [--source DIR] [--folder NAME] [--keep N]
//! packrat prune  [--folder NAME] [--keep N]
//! packrat config init --source DIR --folder NAME [--keep N] [--token TOKEN]
//! packrat config show
//! ```
//!
//! Flags override values from `~/.packrat/config.yaml`. The API token comes
//! from the config file or `$PACKRAT_TOKEN`. Scheduling is external: point
//! cron or launchd at `packrat sync` and let failed runs retry on the next
//! tick.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{backup::BackupArgs, config::ConfigCommand, prune::PruneArgs, sync::SyncArgs};

#[derive(Parser, Debug)]
#[command(
    name = "packrat",
    version,
    about = "Archive a local folder to a cloud drive, with change detection and retention",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the source directory and upload a fresh archive, unconditionally.
    Backup(BackupArgs),

    /// Restore an empty source from the newest archive, then upload only if
    /// the directory fingerprint changed since the last publish.
    Sync(SyncArgs),

    /// Delete remote archives beyond the retention count.
    Prune(PruneArgs),

    /// Manage `~/.packrat/config.yaml`.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Backup(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Prune(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
    }
}
