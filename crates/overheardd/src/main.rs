//! Command line interface for the `overheard` comment scraper.
//!
//! This crate drives the `overheard` library from the shell:
//! - Writing a configuration file with a user agent and storage roots
//! - Fetching source archives from arXiv, politely and with caching
//! - Normalizing fetched sources into one LaTeX file per paper
//! - Scraping long and short comments out of the normalized files
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration file, prompting for a user agent
//! overheard init
//!
//! # Fetch sources, waiting ten seconds after every download
//! overheard fetch 1211.1574 astro-ph/0701019 --delay 10
//!
//! # Normalize them to LaTeX
//! overheard extract 1211.1574 astro-ph/0701019
//!
//! # Long comments to stdout, short comments to a file
//! overheard scrape 1211.1574 astro-ph/0701019 --short short.txt
//!
//! # All of the above for a list of ids, one per line
//! overheard run --from-file ids.txt --long long.txt --short short.txt
//! ```
//!
//! Comments are written to stdout; status messages and logs go to stderr. Use `-v` flags for
//! more logging detail.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fs::File,
  io::{self, BufWriter, Write},
  path::{Path, PathBuf},
  time::Duration,
};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use overheard::{classify::MagicBytes, prelude::*, Config, Overheard};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Fetch arXiv sources and scrape the comments out of them")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Only report errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// User agent sent with every request to arXiv
  #[arg(long, global = true)]
  user_agent: Option<String>,

  /// Directory holding the raw source archives
  #[arg(long, global = true)]
  source_root: Option<PathBuf>,

  /// Directory holding the normalized LaTeX files
  #[arg(long, global = true)]
  latex_root: Option<PathBuf>,

  /// Identify file types in-process instead of calling the `file` utility
  #[arg(long, global = true)]
  builtin_sniffer: bool,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file in use.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Applies command line overrides on top of `config`.
  fn apply_overrides(&self, mut config: Config) -> Config {
    if let Some(user_agent) = &self.user_agent {
      config = config.with_user_agent(user_agent);
    }
    if let Some(source_root) = &self.source_root {
      config = config.with_source_root(source_root);
    }
    if let Some(latex_root) = &self.latex_root {
      config = config.with_latex_root(latex_root);
    }
    if self.verbose > 0 {
      config = config.with_verbose(true);
    }
    config
  }

  /// The configuration file (or the defaults, if there is none) with overrides applied.
  fn load_config(&self) -> Result<Config> {
    let path = self.config_path();
    let config = if path.exists() {
      debug!("Loading configuration from {}", path.display());
      Config::load(&path)?
    } else {
      debug!("No configuration at {}, using defaults", path.display());
      Config::default()
    };
    Ok(self.apply_overrides(config))
  }

  /// The pipeline for the effective configuration.
  fn overheard(&self) -> Result<Overheard> {
    let config = self.load_config()?;
    trace!("Effective configuration: {config:?}");
    let overheard = if self.builtin_sniffer {
      Overheard::with_sniffer(config, MagicBytes)?
    } else {
      Overheard::new(config)?
    };
    Ok(overheard)
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - quiet: error
/// - 0: warn (default)
/// - 1: info
/// - 2: debug
/// - 3+: trace
///
/// `RUST_LOG` takes precedence. Logs go to stderr so comment output on stdout stays clean.
fn setup_logging(verbosity: u8, quiet: bool) {
  let filter = match (quiet, verbosity) {
    (true, _) => "error",
    (false, 0) => "warn",
    (false, 1) => "info",
    (false, 2) => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(verbosity > 1)
    .with_file(verbosity > 2)
    .with_line_number(verbosity > 2)
    .init();
}

/// Entry point for the overheard CLI application
///
/// # Errors
///
/// Returns an [`OverhearddError`] for configuration problems (most often a missing user
/// agent), inconsistent source trees, file system errors, and failed prompts. Failures of
/// individual papers within a batch are logged and do not fail the command.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose, cli.quiet);

  let result = match cli.command.clone() {
    Commands::Init => init(&cli, &cli).await,
    Commands::Fetch(options) => fetch(&cli, &cli, options).await,
    Commands::Extract(ids) => extract(&cli, &cli, ids).await,
    Commands::Scrape(options) => scrape(&cli, &cli, options).await,
    Commands::Run(options) => run(&cli, &cli, options).await,
  };

  if let Err(e) = &result {
    cli.reply(ResponseContent::Error(e))?;
  }
  result
}
