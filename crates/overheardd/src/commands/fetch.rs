//! Module for downloading source archives

use super::*;

/// Function for the [`Commands::Fetch`] in the CLI.
pub async fn fetch<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  options: FetchOptions,
) -> Result<()> {
  let ids = options.ids.collect()?;
  let overheard = cli.overheard()?;
  let fetched = overheard.fetch_all(&ids, options.pacing.delay(), options.pacing.force).await?;
  if fetched {
    interaction.reply(ResponseContent::Success(&format!(
      "Source tree up to date for {} papers in {}",
      ids.len(),
      overheard.config().source_root.display()
    )))
  } else {
    interaction.reply(ResponseContent::Info("Nothing downloaded"))
  }
}
