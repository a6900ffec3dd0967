//! Module for running the whole pipeline

use super::*;

/// Function for the [`Commands::Run`] in the CLI.
///
/// Fetches, extracts, and scrapes in sequence, so a rerun after an interruption picks up cached
/// sources and regenerates the rest.
pub async fn run<I: UserInteraction>(interaction: &I, cli: &Cli, options: RunOptions) -> Result<()> {
  let ids = options.ids.collect()?;
  let overheard = cli.overheard()?;

  overheard.fetch_all(&ids, options.pacing.delay(), options.pacing.force).await?;
  let written = overheard.extract_all(&ids).await?;
  debug!("Extracted {written} of {} papers", ids.len());

  let (mut long, mut short) = options.sinks.open()?;
  overheard.write_output(&ids, &mut long, &mut short, options.sinks.snapshot.as_deref())?;
  interaction.reply(ResponseContent::Success(&format!("Processed {} papers", ids.len())))
}
