//! Subcommands and the arguments they share.

use super::*;

pub mod extract;
pub mod fetch;
pub mod init;
pub mod run;
pub mod scrape;

pub use extract::extract;
pub use fetch::fetch;
pub use init::init;
pub use run::run;
pub use scrape::scrape;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file with a user agent and storage locations
  Init,

  /// Download source archives into the source tree
  Fetch(FetchOptions),

  /// Normalize downloaded sources into one LaTeX file per paper
  Extract(Identifiers),

  /// Write the comments found in normalized LaTeX files
  Scrape(ScrapeOptions),

  /// Fetch, extract, and scrape in one go
  Run(RunOptions),
}

/// The papers a command works on
#[derive(Args, Clone, Debug)]
pub struct Identifiers {
  /// arXiv identifiers, e.g. "1211.1574" or "astro-ph/0701019v2"
  pub identifiers: Vec<String>,

  /// File with one identifier per line; blank lines and lines starting with `#` are ignored
  #[arg(long)]
  pub from_file: Option<PathBuf>,
}

impl Identifiers {
  /// Positional identifiers followed by those from `--from-file`.
  pub fn collect(&self) -> Result<Vec<String>> {
    let mut ids = self.identifiers.clone();
    if let Some(path) = &self.from_file {
      let content = std::fs::read_to_string(path)?;
      ids.extend(
        content
          .lines()
          .map(str::trim)
          .filter(|line| !line.is_empty() && !line.starts_with('#'))
          .map(str::to_owned),
      );
    }
    if ids.is_empty() {
      return Err(OverhearddError::NoIdentifiers);
    }
    Ok(ids)
  }
}

/// How downloads are paced
#[derive(Args, Clone, Debug)]
pub struct Pacing {
  /// Seconds to wait after each download (never after a cache hit)
  #[arg(long, default_value_t = 10)]
  pub delay: u64,

  /// Download again even when a source file is already cached
  #[arg(long)]
  pub force: bool,
}

impl Pacing {
  /// The delay as a [`Duration`].
  pub fn delay(&self) -> Duration { Duration::from_secs(self.delay) }
}

/// Arguments for [`Commands::Fetch`]
#[derive(Args, Clone, Debug)]
pub struct FetchOptions {
  /// Papers to fetch
  #[command(flatten)]
  pub ids:    Identifiers,
  /// Request pacing
  #[command(flatten)]
  pub pacing: Pacing,
}

/// Where comments go
#[derive(Args, Clone, Debug)]
pub struct Sinks {
  /// File for long comments, stdout when omitted
  #[arg(long)]
  pub long:     Option<PathBuf>,
  /// File for short comments, stdout when omitted
  #[arg(long)]
  pub short:    Option<PathBuf>,
  /// JSON file receiving every paper's comments keyed by identifier
  #[arg(long)]
  pub snapshot: Option<PathBuf>,
}

impl Sinks {
  /// Opens the long and short comment outputs.
  pub fn open(&self) -> Result<(Box<dyn Write>, Box<dyn Write>)> {
    Ok((open_sink(self.long.as_deref())?, open_sink(self.short.as_deref())?))
  }
}

/// A buffered file, or stdout.
fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
  Ok(match path {
    Some(path) => {
      overheard::layout::ensure_parent_dirs(path)?;
      Box::new(BufWriter::new(File::create(path)?))
    },
    None => Box::new(io::stdout()),
  })
}

/// Arguments for [`Commands::Scrape`]
#[derive(Args, Clone, Debug)]
pub struct ScrapeOptions {
  /// Papers to scrape
  #[command(flatten)]
  pub ids:   Identifiers,
  /// Outputs
  #[command(flatten)]
  pub sinks: Sinks,
}

/// Arguments for [`Commands::Run`]
#[derive(Args, Clone, Debug)]
pub struct RunOptions {
  /// Papers to process
  #[command(flatten)]
  pub ids:    Identifiers,
  /// Request pacing
  #[command(flatten)]
  pub pacing: Pacing,
  /// Outputs
  #[command(flatten)]
  pub sinks:  Sinks,
}
