//! Error type for the command line interface.

use thiserror::Error;

use super::*;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum OverhearddError {
  /// Errors from the `overheard` library
  #[error(transparent)]
  Overheard(#[from] OverheardError),

  /// Terminal prompts failed
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Reading identifier lists or writing output files failed
  #[error(transparent)]
  Io(#[from] io::Error),

  /// The command was given nothing to work on
  #[error("No identifiers given. Pass them as arguments or with --from-file")]
  NoIdentifiers,
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, OverhearddError>;
