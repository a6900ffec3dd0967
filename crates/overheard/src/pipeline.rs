//! The [`Overheard`] facade.
//!
//! Ties the three stages together over one [`Config`]:
//!
//! 1. [`Fetcher`] fills the source tree
//! 2. [`Extractor`] turns each source file into one `.tex` file
//! 3. [`Scraper`] pulls the comments out of the `.tex` files
//!
//! Every stage is idempotent with respect to its outputs, so a batch can simply be rerun after an
//! interruption.

use crate::{classify::FileCommand, extract::Extractor, fetch::Fetcher, scrape::Scraper};

use super::*;

/// Fetch, extract, and scrape with one shared configuration.
#[derive(Debug, Clone)]
pub struct Overheard {
  /// Configuration all stages were built from
  config:    Config,
  /// Acquisition stage
  fetcher:   Fetcher,
  /// Extraction stage
  extractor: Extractor,
  /// Scraping stage
  scraper:   Scraper,
}

impl Overheard {
  /// Builds the pipeline, sniffing content with the `file` utility.
  ///
  /// Fails if `config` names an encoding that does not exist. A missing user agent only fails
  /// once something is actually fetched.
  pub fn new(config: Config) -> Result<Self> { Self::with_sniffer(config, FileCommand::new()) }

  /// Builds the pipeline with a specific content sniffer.
  pub fn with_sniffer(config: Config, sniffer: impl Sniffer + 'static) -> Result<Self> {
    let sniffer: Arc<dyn Sniffer> = Arc::new(sniffer);
    Ok(Self {
      scraper: Scraper::new(&config)?,
      fetcher: Fetcher::new(config.clone(), Arc::clone(&sniffer)),
      extractor: Extractor::new(config.clone(), sniffer),
      config,
    })
  }

  /// The configuration in use.
  pub fn config(&self) -> &Config { &self.config }

  /// The acquisition stage.
  pub fn fetcher(&self) -> &Fetcher { &self.fetcher }

  /// The extraction stage.
  pub fn extractor(&self) -> &Extractor { &self.extractor }

  /// The scraping stage.
  pub fn scraper(&self) -> &Scraper { &self.scraper }

  /// Sends scratch directories somewhere other than the system temp dir.
  pub fn with_scratch_root(mut self, path: impl AsRef<Path>) -> Self {
    self.extractor = self.extractor.with_scratch_root(path);
    self
  }

  /// See [`Fetcher::fetch_all`].
  pub async fn fetch_all<S: AsRef<str>>(
    &self,
    ids: &[S],
    delay: Duration,
    force: bool,
  ) -> Result<bool> {
    self.fetcher.fetch_all(ids, delay, force).await
  }

  /// See [`Extractor::extract_all`].
  pub async fn extract_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<usize> {
    self.extractor.extract_all(ids).await
  }

  /// See [`Scraper::write_output`].
  pub fn write_output<S, L, W>(
    &self,
    ids: &[S],
    long_sink: &mut L,
    short_sink: &mut W,
    snapshot: Option<&Path>,
  ) -> Result<()>
  where
    S: AsRef<str>,
    L: Write + ?Sized,
    W: Write + ?Sized,
  {
    self.scraper.write_output(ids, long_sink, short_sink, snapshot)
  }

  /// Runs all three stages over a batch.
  pub async fn process<S, L, W>(
    &self,
    ids: &[S],
    delay: Duration,
    force: bool,
    long_sink: &mut L,
    short_sink: &mut W,
  ) -> Result<()>
  where
    S: AsRef<str>,
    L: Write + ?Sized,
    W: Write + ?Sized,
  {
    let fetched = self.fetch_all(ids, delay, force).await?;
    debug!("Fetch stage done, network used: {fetched}");
    let extracted = self.extract_all(ids).await?;
    debug!("Extracted {extracted} of {} papers", ids.len());
    self.write_output(ids, long_sink, short_sink, None)
  }
}
