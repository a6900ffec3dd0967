//! Module for writing an `overheard` configuration file

use super::*;

/// Function for the [`Commands::Init`] in the CLI.
///
/// Starts from the defaults plus any command line overrides, asks for a user agent when none was
/// given, and writes the result to the configuration path.
pub async fn init<I: UserInteraction>(interaction: &I, cli: &Cli) -> Result<()> {
  let path = cli.config_path();
  if path.exists()
    && !interaction
      .confirm(&format!("A configuration already exists at {}. Overwrite it?", path.display()))?
  {
    interaction.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    return Ok(());
  }

  let mut config = cli.apply_overrides(Config::default());
  if config.user_agent.is_none() {
    let user_agent = interaction
      .prompt("User agent to identify yourself to arXiv with, e.g. \"name (email)\"")?;
    let user_agent = user_agent.trim();
    if user_agent.is_empty() {
      interaction.reply(ResponseContent::Info(
        "No user agent set; fetching will fail until one is added to the configuration or \
         passed with --user-agent",
      ))?;
    } else {
      config = config.with_user_agent(user_agent);
    }
  }

  config.save(&path)?;
  interaction.reply(ResponseContent::Success(&format!(
    "Wrote configuration to {}\nSource root: {}\nLaTeX root:  {}",
    path.display(),
    config.source_root.display(),
    config.latex_root.display(),
  )))?;
  Ok(())
}
