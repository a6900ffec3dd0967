//! Module for normalizing source archives into LaTeX

use super::*;

/// Function for the [`Commands::Extract`] in the CLI.
pub async fn extract<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  ids: Identifiers,
) -> Result<()> {
  let ids = ids.collect()?;
  let overheard = cli.overheard()?;
  let written = overheard.extract_all(&ids).await?;
  interaction.reply(ResponseContent::Success(&format!(
    "Wrote {written} of {} LaTeX files to {}",
    ids.len(),
    overheard.config().latex_root.display()
  )))
}
