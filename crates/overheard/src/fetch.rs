//! Cached retrieval of source archives.
//!
//! Sources are fetched from `<base_url><identifier>` (by default
//! `http://arxiv.org/e-print/<identifier>`). arXiv serves the latest version for an unversioned
//! id and also for a version number past the latest one; that behavior is relied on, not
//! reimplemented.
//!
//! The response has no useful name or extension, so it is sniffed after download and stored as
//! `<stem>.pdf` or `<stem>.gz`, the same names arXiv's bulk data uses. Downloads go to a hidden
//! temporary file in the target directory and are renamed into place only once complete, so an
//! interrupted transfer never looks like a cached source file.
//!
//! # Examples
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use overheard::{classify::FileCommand, fetch::Fetcher, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default().with_user_agent("my-comment-scraper (me@example.org)");
//! let fetcher = Fetcher::new(config, Arc::new(FileCommand::new()));
//!
//! // Only the first call touches the network.
//! assert!(fetcher.fetch(&"1211.1574".parse()?, false).await?);
//! assert!(!fetcher.fetch(&"1211.1574".parse()?, false).await?);
//!
//! // Sleep ten seconds after every download, but not after cache hits.
//! fetcher.fetch_all(&["1211.4164", "astro-ph/0701528"], Duration::from_secs(10), false).await?;
//! # Ok(())
//! # }
//! ```

use super::*;

/// Downloads source archives into the source tree.
#[derive(Debug, Clone)]
pub struct Fetcher {
  /// Shared HTTP client
  client:  reqwest::Client,
  /// User agent, endpoint, and verbosity
  config:  Config,
  /// Where source files go
  layout:  Layout,
  /// Decides between `.pdf` and `.gz`
  sniffer: Arc<dyn Sniffer>,
}

impl Fetcher {
  /// Creates a fetcher for the source tree described by `config`.
  pub fn new(config: Config, sniffer: Arc<dyn Sniffer>) -> Self {
    let layout = config.layout();
    Self { client: reqwest::Client::new(), config, layout, sniffer }
  }

  /// The URL a paper's source is fetched from: the base URL followed by the verbatim id.
  pub fn url(&self, id: &ArxivId) -> String { format!("{}{id}", self.config.base_url) }

  /// Ensures the source file for `id` is in the source tree.
  ///
  /// Returns whether a download actually happened, so callers can pace themselves only after
  /// real network traffic. Without `force`, a cached source file short-circuits the call.
  ///
  /// A download that is neither PDF nor gzip is logged and dropped rather than treated as an
  /// error; one odd submission must not sink a batch.
  ///
  /// A forced fetch whose download lands under the other extension deletes the previously
  /// cached file, so a paper never has both a `.gz` and a `.pdf`.
  ///
  /// # Errors
  ///
  /// - [`OverheardError::Configuration`] if no user agent is set (checked before any network
  ///   access)
  /// - [`OverheardError::AmbiguousArtifact`] if the cache holds both a `.gz` and a `.pdf`
  /// - [`OverheardError::ApiError`] for a non-success HTTP status
  /// - network, file system, and sniffer errors
  pub async fn fetch(&self, id: &ArxivId, force: bool) -> Result<bool> {
    if !force {
      match self.layout.raw_path(id) {
        Ok(path) => {
          progress(
            self.config.verbose,
            format!("Using cached source file for {id}: {}", path.display()),
          );
          return Ok(false);
        },
        Err(OverheardError::NotFound(_)) => {},
        Err(e) => return Err(e),
      }
    }

    let user_agent = self.config.require_user_agent()?;
    let base = self.layout.raw_path_base(id);
    layout::ensure_parent_dirs(&base)?;
    let partition = base.parent().unwrap_or(self.layout.source_root());
    let mut download = tempfile::Builder::new().prefix(".overheard-").tempfile_in(partition)?;

    let url = self.url(id);
    progress(self.config.verbose, format!("Fetching {id} from {url}"));
    let mut response =
      self.client.get(&url).header(reqwest::header::USER_AGENT, user_agent).send().await?;
    if !response.status().is_success() {
      trace!("{id} response: {response:?}");
      return Err(OverheardError::ApiError(format!(
        "Failed to fetch source for {id}: {}",
        response.status()
      )));
    }
    while let Some(chunk) = response.chunk().await? {
      download.write_all(&chunk)?;
    }
    download.flush()?;

    let kind = self.sniffer.classify(download.path()).await?;
    let ext = match kind {
      ContentKind::Pdf => "pdf",
      ContentKind::Gzip => "gz",
      other => {
        warn!("Unrecognized file type for {id} ({other}), not keeping it");
        return Ok(true);
      },
    };

    let target = layout::with_appended_extension(&base, ext);
    for stale in self.layout.existing_raw_paths(id).into_iter().filter(|p| *p != target) {
      debug!("Removing superseded source file {}", stale.display());
      fs::remove_file(stale)?;
    }
    publish_permissions(download.as_file())?;
    download.persist(&target)?;
    debug!("Stored source for {id} at {}", target.display());
    Ok(true)
  }

  /// Fetches every identifier in order, sleeping `delay` after each download.
  ///
  /// Cache hits are never followed by a delay. Malformed identifiers and per-paper failures are
  /// logged and skipped; a failed download still counts as traffic and is followed by the delay.
  /// Systemic errors ([`OverheardError::is_systemic`]) abort the batch.
  ///
  /// Returns whether anything was downloaded.
  pub async fn fetch_all<S: AsRef<str>>(
    &self,
    ids: &[S],
    delay: Duration,
    force: bool,
  ) -> Result<bool> {
    let mut any_fetched = false;
    for id in parse_batch(ids) {
      match self.fetch(&id, force).await {
        Ok(false) => continue,
        Ok(true) => any_fetched = true,
        Err(e) if e.is_systemic() => return Err(e),
        Err(e) => warn!("Failed to fetch source for {id}: {e}"),
      }
      tokio::time::sleep(delay).await;
    }
    Ok(any_fetched)
  }
}

/// Temporary files are created owner-only; stored sources are ordinary readable files.
#[cfg(unix)]
fn publish_permissions(file: &File) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn publish_permissions(_file: &File) -> io::Result<()> { Ok(()) }
