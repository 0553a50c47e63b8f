// SPDX-License-Identifier: MIT

mod config;
mod render;
mod shell;
mod utils;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use chainfs::prelude::*;
use chainio::prelude::*;
use clap::{Parser, Subcommand};

use crate::config::StoreConfig;
use crate::render::{write_listing, write_opened, write_report};
use crate::shell::Shell;
use crate::utils::{LogLevel, set_log_level};

#[derive(Parser)]
#[command(name = "chainctl", version, about = "Chained-block file store", long_about = None)]
struct Cli {
    /// Store root directory
    #[arg(short, long, global = true, default_value = "fat-store")]
    root: PathBuf,

    /// Config file (defaults to <root>/chainfat.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured block size
    #[arg(long, global = true)]
    block_size: Option<usize>,

    /// Print resolved settings and I/O statistics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a file
    Create {
        name: String,
        /// Inline content
        #[arg(required_unless_present = "from")]
        content: Option<String>,
        /// Read the content from a local file instead
        #[arg(long, conflicts_with = "content")]
        from: Option<PathBuf>,
    },
    /// List active files
    List,
    /// List the recycle bin
    Recycled,
    /// Print a file (1-based number from `list`)
    Open { number: usize },
    /// Replace the content of a file (1-based number from `list`)
    Modify { number: usize, content: String },
    /// Move a file to the recycle bin (1-based number from `list`)
    Delete { number: usize },
    /// Bring a file back (1-based number from `recycled`)
    Restore { number: usize },
    /// Verify chains, lengths and orphan blocks
    Check,
    /// Interactive menu
    Shell,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    set_log_level(if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    });

    if let Err(e) = run(cli) {
        log_error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = StoreConfig::discover(&cli.root, cli.config.as_deref())?;
    if let Some(src) = &config.source {
        log_verbose!("Config: {}", src.display());
    }
    let meta = config.resolve(cli.block_size)?;
    log_verbose!("Store root: {}", cli.root.display());
    log_verbose!(
        "Block size: {} characters, duplicate names: {}",
        meta.block_size,
        if meta.allow_duplicate_names { "allowed" } else { "rejected" }
    );

    let io = StdBlobIO::new(&cli.root)
        .with_context(|| format!("opening store {}", cli.root.display()))?;
    let mut store = FatSystem::mount(IOCounter::new(io), meta)?;
    log_verbose!("Mounted {} entries", store.directory().len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Create {
            name,
            content,
            from,
        } => {
            let content = match (content, from) {
                (Some(content), _) => content,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("no content given"),
            };
            let slot = store.create(&name, &content)?;
            log_info!("File created: {name} ({} characters)", content.chars().count());
            log_verbose!("Table slot {slot}");
        }
        Commands::List => write_listing(&mut out, &store.list(View::Active), View::Active)?,
        Commands::Recycled => write_listing(&mut out, &store.list(View::Recycled), View::Recycled)?,
        Commands::Open { number } => {
            let file = store.open(to_index(number)?)?;
            write_opened(&mut out, &file)?;
        }
        Commands::Modify { number, content } => {
            let slot = store
                .directory()
                .find_by_index(View::Active, to_index(number)?)?;
            log_info!("Modifying file: {}", store.directory().get(slot)?.name);
            store.modify_slot(slot, &content)?;
            log_info!("File modified.");
        }
        Commands::Delete { number } => {
            store.delete(to_index(number)?)?;
            log_info!("File moved to the recycle bin.");
        }
        Commands::Restore { number } => {
            store.restore(to_index(number)?)?;
            log_info!("File restored.");
        }
        Commands::Check => {
            let report = store.check()?;
            write_report(&mut out, &report)?;
            if !report.ok() {
                bail!("consistency check failed");
            }
        }
        Commands::Shell => {
            let stdin = io::stdin();
            Shell::new(&mut store, stdin.lock(), &mut out).run()?;
        }
    }

    out.flush()?;
    log_verbose!("I/O: {}", store.io().stats);
    Ok(())
}

/// Converts a 1-based listing number to an index.
fn to_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .context("listing numbers start at 1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_parse_globals_after_subcommand() {
        let cli = Cli::try_parse_from(["chainctl", "open", "2", "--root", "elsewhere", "-v"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("elsewhere"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Open { number: 2 }));
    }
}
