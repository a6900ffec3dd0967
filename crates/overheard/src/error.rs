//! Error types for the overheard library.
//!
//! Failures fall into two groups. Per-identifier failures (a malformed id, a missing cached
//! archive, an undecodable LaTeX file, a network hiccup) are reported and skipped by the batch
//! operations. Systemic failures (two cached archives for one paper, a missing user agent) abort
//! the batch, see [`OverheardError::is_systemic`].
//!
//! # Examples
//!
//! ```
//! use overheard::{error::OverheardError, identifier::ArxivId};
//!
//! match "not-an-id".parse::<ArxivId>() {
//!   Err(OverheardError::InvalidIdentifier(id)) => println!("Invalid arXiv id: {id}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Success!"),
//! }
//! ```

use thiserror::Error;

use super::*;

/// Error type alias used for the [`overheard`](crate) crate.
pub type Result<T> = core::result::Result<T, OverheardError>;

/// Errors that can occur while fetching, extracting, or scraping papers.
#[derive(Error, Debug)]
pub enum OverheardError {
  /// The string matches neither the old-style nor the new-style arXiv grammar.
  #[error("Invalid arXiv identifier: {0}")]
  InvalidIdentifier(String),

  /// No raw source archive is cached for this identifier.
  ///
  /// Recoverable by fetching the paper.
  #[error("No source file exists for {0}")]
  NotFound(String),

  /// More than one raw source archive (`.gz` and `.pdf`) is cached for one identifier.
  ///
  /// This is a consistency fault in the source tree and is never resolved automatically.
  #[error("More than one source file exists for {identifier}: {paths:?}")]
  AmbiguousArtifact {
    /// The identifier whose artifacts collide
    identifier: String,
    /// Every artifact found for it
    paths:      Vec<PathBuf>,
  },

  /// The configuration is unusable, e.g. no user agent was set before fetching.
  #[error("Configuration error: {0}")]
  Configuration(String),

  /// Extraction was requested for a paper whose source archive was never fetched.
  #[error("Cannot extract LaTeX for {0}: source file not found")]
  SourceMissing(String),

  /// None of the configured text encodings could decode the file.
  #[error("No configured encoding could decode {0}")]
  UndecodableFile(PathBuf),

  /// The content sniffer could not be run or produced unusable output.
  #[error("Content sniffing failed: {0}")]
  Sniff(String),

  /// The remote repository answered with a non-success status.
  #[error("API error: {0}")]
  ApiError(String),

  /// A network request failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A downloaded temporary file could not be moved into the source tree.
  #[error(transparent)]
  Persist(#[from] tempfile::PersistError),

  /// Writing the JSON comment snapshot failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),
}

impl OverheardError {
  /// Whether this error signals a problem with the whole setup rather than one paper.
  ///
  /// Batch operations abort on systemic errors and log-and-skip everything else.
  pub fn is_systemic(&self) -> bool {
    matches!(self, Self::AmbiguousArtifact { .. } | Self::Configuration(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_systemic_errors() {
    assert!(OverheardError::Configuration("no user agent".into()).is_systemic());
    assert!(OverheardError::AmbiguousArtifact { identifier: "1211.1574".into(), paths: vec![] }
      .is_systemic());
    assert!(!OverheardError::NotFound("1211.1574".into()).is_systemic());
    assert!(!OverheardError::SourceMissing("1211.1574".into()).is_systemic());
    assert!(!OverheardError::InvalidIdentifier("junk".into()).is_systemic());
    assert!(!OverheardError::UndecodableFile(PathBuf::from("x.tex")).is_systemic());
  }
}
