//! Comment scraping for arXiv LaTeX sources.
//!
//! `overheard` takes arXiv identifiers and turns them into the comments authors left in their
//! LaTeX source. It provides:
//!
//! - Identifier parsing for both old-style (`astro-ph/0701019`) and new-style (`1211.1574`) ids
//! - A local source archive laid out like arXiv's bulk data (`<yymm>/<stem>.{gz,pdf}`)
//! - Polite, cached retrieval of source archives from `arxiv.org/e-print/`
//! - Normalization of gzip/tar/plain submissions into one `.tex` file per paper
//! - Extraction of "long" (whole-line) and "short" (end-of-line) comments
//!
//! # Getting Started
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use overheard::{prelude::*, Config, Overheard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default().with_user_agent("my-comment-scraper (me@example.org)");
//!   let overheard = Overheard::new(config)?;
//!
//!   let ids = ["astro-ph/0701019", "1211.1574"];
//!   overheard.fetch_all(&ids, Duration::from_secs(10), false).await?;
//!   overheard.extract_all(&ids).await?;
//!
//!   let mut long = Vec::new();
//!   let mut short = Vec::new();
//!   overheard.write_output(&ids, &mut long, &mut short, None)?;
//!   println!("{}", String::from_utf8_lossy(&long));
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`identifier`]: arXiv identifier grammar and decomposition
//! - [`layout`]: where raw and normalized artifacts live on disk
//! - [`classify`]: content sniffing of untyped downloads
//! - [`fetch`]: cached retrieval of source archives
//! - [`extract`]: normalization of source archives into LaTeX
//! - [`scrape`]: long and short comment extraction
//! - [`pipeline`]: the [`Overheard`] facade tying the stages together

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  fs::{self, File},
  io::{self, Write},
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod identifier;
pub mod layout;
pub mod pipeline;
pub mod scrape;

pub use crate::{config::Config, pipeline::Overheard};
use crate::{
  classify::{ContentKind, Sniffer},
  error::*,
  identifier::ArxivId,
  layout::Layout,
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use overheard::{prelude::*, Config, Overheard};
///
/// async fn example() -> Result<(), OverheardError> {
///   let overheard = Overheard::new(Config::default().with_user_agent("me"))?;
///   let id: ArxivId = "1211.1574".parse()?;
///   overheard.fetcher().fetch(&id, false).await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    classify::{ContentKind, Sniffer},
    error::OverheardError,
    identifier::ArxivId,
  };
}

/// Emits a progress message at `info` when verbose, `debug` otherwise.
fn progress(verbose: bool, message: impl Display) {
  if verbose {
    info!("{message}");
  } else {
    debug!("{message}");
  }
}

/// Parses every identifier in a batch, logging and dropping the malformed ones.
fn parse_batch<S: AsRef<str>>(ids: &[S]) -> Vec<ArxivId> {
  ids
    .iter()
    .filter_map(|id| match id.as_ref().parse::<ArxivId>() {
      Ok(id) => Some(id),
      Err(e) => {
        warn!("Skipping {}: {e}", id.as_ref());
        None
      },
    })
    .collect()
}
