//! # termdict CLI (`tdict`)
//!
//! Look up words in online dictionaries from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! tdict [--config ./tdict.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tdict init` | Create the lookup cache database |
//! | `tdict dicts` | List dictionary providers and whether they are configured |
//! | `tdict lookup <word>...` | Look up words and print their definitions |
//!
//! ## Examples
//!
//! ```bash
//! # Default dictionary (Yahoo)
//! tdict lookup search
//!
//! # Several words, every dictionary, with synonyms
//! tdict lookup search "hold on" --all --verbose
//!
//! # Read words from stdin, bypassing the cache
//! printf 'search\ngoogle\n' | tdict lookup --no-cache
//! ```
//!
//! Set `TDICT_LOG=debug` to see fetch and normalization diagnostics on stderr.

use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use termdict::cache::RecordCache;
use termdict::config;
use termdict::dicts;
use termdict::lookup::{self, LookupOptions};
use termdict::models::Provider;
use termdict::present::ColorMode;

/// termdict: formatted dictionary lookups in the terminal.
#[derive(Parser)]
#[command(
    name = "tdict",
    about = "termdict: look up words in online dictionaries from the terminal",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `~/.tdict/tdict.toml` when that file exists; otherwise
    /// built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Create the lookup cache database.
    ///
    /// Idempotent: running it on an existing cache keeps its records.
    Init,

    /// List dictionary providers and their configuration status.
    Dicts,

    /// Look up words and print formatted definitions.
    ///
    /// Without words, reads one word per line from stdin.
    Lookup {
        /// Words to look up.
        words: Vec<String>,

        /// Dictionary to use (repeatable). Defaults to `display.default_dicts`.
        #[arg(long = "dict", short = 'd')]
        dicts: Vec<Provider>,

        /// Use every dictionary.
        #[arg(long, conflicts_with = "dicts")]
        all: bool,

        /// Show synonyms and other supplementary content.
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Skip the cache: always fetch, and do not store the result.
        #[arg(long)]
        no_cache: bool,

        /// When to color output. Defaults to `display.color`.
        #[arg(long, value_enum)]
        color: Option<ColorMode>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TDICT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_stdin_words() -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            words.push(line.trim().to_string());
        }
    }
    Ok(words)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            let cache = RecordCache::open(&cfg.cache).await?;
            let count = cache.count().await?;
            cache.close().await;
            println!(
                "Cache initialized at {} ({} records).",
                cfg.cache.path.display(),
                count
            );
        }
        Commands::Dicts => {
            dicts::list_dicts(&cfg)?;
        }
        Commands::Lookup {
            words,
            dicts,
            all,
            verbose,
            no_cache,
            color,
        } => {
            let providers = if all {
                Provider::ALL.to_vec()
            } else if dicts.is_empty() {
                cfg.default_providers()?
            } else {
                dicts
            };
            let words = if words.is_empty() {
                read_stdin_words()?
            } else {
                words
            };
            let options = LookupOptions {
                providers,
                use_cache: !no_cache,
                verbose: verbose || cfg.display.verbose,
                color: color.unwrap_or(cfg.display.color),
            };
            lookup::run_lookup(&cfg, &words, &options).await?;
        }
    }

    Ok(())
}
