//! Module for writing out comments

use super::*;

/// Function for the [`Commands::Scrape`] in the CLI.
pub async fn scrape<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  options: ScrapeOptions,
) -> Result<()> {
  let ids = options.ids.collect()?;
  let overheard = cli.overheard()?;
  let (mut long, mut short) = options.sinks.open()?;
  overheard.write_output(&ids, &mut long, &mut short, options.sinks.snapshot.as_deref())?;
  interaction.reply(ResponseContent::Info(&format!("Scraped {} papers", ids.len())))
}
