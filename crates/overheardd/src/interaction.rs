//! Prompts and status messages.
//!
//! Everything here goes to stderr; stdout is reserved for scraped comments.

use dialoguer::{Confirm, Input};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";

/// A message for the user
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Something worked
  Success(&'a str),
  /// Neutral information
  Info(&'a str),
  /// A command failed
  Error(&'a OverhearddError),
}

/// How commands talk to the person running them
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for free text, which may be empty.
  fn prompt(&self, message: &str) -> Result<String>;
  /// Shows a message.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{} {message}", style(PROMPT_PREFIX).yellow()))
        .default(false)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{} {message}", style(PROMPT_PREFIX).yellow()))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    let mut stderr = io::stderr();
    match content {
      ResponseContent::Success(message) => {
        writeln!(stderr, "{} {}", style(SUCCESS_PREFIX).green(), style(message).white())?
      },
      ResponseContent::Info(message) if !self.quiet => {
        writeln!(stderr, "{} {}", style(INFO_PREFIX).blue(), style(message).white())?
      },
      ResponseContent::Info(_) => {},
      ResponseContent::Error(error) => {
        writeln!(stderr, "{} {}", style(ERROR_PREFIX).red(), style(error).red())?
      },
    }
    Ok(())
  }
}
