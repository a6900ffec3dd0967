//! Runtime configuration.
//!
//! Everything that used to be process-wide state (verbosity, the user agent sent to arXiv, the
//! location of the source and LaTeX trees) lives in one [`Config`] value that is handed to the
//! stages when they are built. A config can be persisted as TOML:
//!
//! ```toml
//! verbose = true
//! user_agent = "my-comment-scraper (me@example.org)"
//! source_root = "/data/arxiv/src"
//! latex_root = "/data/arxiv/latex"
//! base_url = "http://arxiv.org/e-print/"
//! encodings = ["utf-8", "iso-8859-1"]
//! ```

use super::*;

/// Default endpoint source archives are fetched from; the identifier is appended verbatim.
pub const DEFAULT_BASE_URL: &str = "http://arxiv.org/e-print/";

/// Text encodings tried, in order, when reading a normalized LaTeX file.
pub const DEFAULT_ENCODINGS: [&str; 7] =
  ["utf-8", "iso-8859-1", "gb2312", "windows-1251", "windows-1252", "utf-16le", "utf-16be"];

/// Configuration shared by the fetch, extract, and scrape stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Report per-paper progress at `info` rather than `debug`
  pub verbose:     bool,
  /// `User-Agent` sent to arXiv; fetching refuses to run without one
  pub user_agent:  Option<String>,
  /// Root of the raw source tree (`<source_root>/<yymm>/<stem>.{gz,pdf}`)
  pub source_root: PathBuf,
  /// Root of the normalized LaTeX tree (`<latex_root>/<yymm>/<stem>.tex`)
  pub latex_root:  PathBuf,
  /// Endpoint prefix for source downloads
  pub base_url:    String,
  /// Encoding labels tried in order by the scraper
  pub encodings:   Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    let data = Self::default_data_dir();
    Self {
      verbose:     false,
      user_agent:  None,
      source_root: data.join("source"),
      latex_root:  data.join("latex"),
      base_url:    DEFAULT_BASE_URL.to_owned(),
      encodings:   DEFAULT_ENCODINGS.iter().map(|e| (*e).to_owned()).collect(),
    }
  }
}

impl Config {
  /// Platform data directory for overheard, e.g. `~/.local/share/overheard` on Linux.
  ///
  /// Falls back to `./overheard` when no data directory is known.
  pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("overheard")
  }

  /// Default location of the configuration file, e.g. `~/.config/overheard/config.toml`.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("overheard").join("config.toml")
  }

  /// Sets the user agent sent with every fetch.
  pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = Some(user_agent.into());
    self
  }

  /// Sets the raw source tree root.
  pub fn with_source_root(mut self, path: impl AsRef<Path>) -> Self {
    self.source_root = path.as_ref().to_path_buf();
    self
  }

  /// Sets the normalized LaTeX tree root.
  pub fn with_latex_root(mut self, path: impl AsRef<Path>) -> Self {
    self.latex_root = path.as_ref().to_path_buf();
    self
  }

  /// Sets the endpoint prefix source archives are fetched from.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Replaces the list of encodings the scraper tries.
  pub fn with_encodings<S: Into<String>>(mut self, encodings: impl IntoIterator<Item = S>) -> Self {
    self.encodings = encodings.into_iter().map(Into::into).collect();
    self
  }

  /// Toggles verbose progress reporting.
  pub fn with_verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  /// The on-disk layout described by this configuration.
  pub fn layout(&self) -> Layout { Layout::new(&self.source_root, &self.latex_root) }

  /// The configured user agent, or a [`OverheardError::Configuration`] error.
  ///
  /// arXiv blocks some default client user agents and anonymous bulk traffic is impolite, so an
  /// empty or missing value is refused.
  pub fn require_user_agent(&self) -> Result<&str> {
    match self.user_agent.as_deref().map(str::trim) {
      Some(agent) if !agent.is_empty() => Ok(agent),
      _ => Err(OverheardError::Configuration(
        "No user agent set. arXiv rejects requests without an identifying user agent; set one \
         with `Config::with_user_agent` or `--user-agent`"
          .into(),
      )),
    }
  }

  /// Resolves the configured encoding labels.
  pub fn resolve_encodings(&self) -> Result<Vec<&'static encoding_rs::Encoding>> {
    let encodings = self
      .encodings
      .iter()
      .map(|label| {
        encoding_rs::Encoding::for_label(label.as_bytes())
          .ok_or_else(|| OverheardError::Configuration(format!("Unknown text encoding: {label}")))
      })
      .collect::<Result<Vec<_>>>()?;
    if encodings.is_empty() {
      return Err(OverheardError::Configuration("At least one text encoding is required".into()));
    }
    Ok(encodings)
  }

  /// Loads a configuration from a TOML file; missing fields take their defaults.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(toml::from_str(&content)?)
  }

  /// Writes this configuration as TOML, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    layout::ensure_parent_dirs(path)?;
    fs::write(path, toml::to_string_pretty(self)?)?;
    debug!("Wrote configuration to {}", path.display());
    Ok(())
  }
}
