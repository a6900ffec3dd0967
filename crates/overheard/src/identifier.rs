//! arXiv identifier grammar.
//!
//! arXiv has used two identifier schemes:
//!
//! - old-style, `archive/yymmNNN[vN]`, e.g. `astro-ph/0701019v2`, where the archive name is
//!   lowercase letters and dashes and `NNN` is a three digit serial number
//! - new-style, `yymm.NNNN[vN]`, e.g. `1211.1574`, with a four digit serial number and no archive
//!
//! The two grammars are disjoint: an old-style id always contains a `/`, a new-style id never
//! does. Parsing tries the new-style grammar first and falls back to the old-style one.
//!
//! # Examples
//!
//! ```
//! use overheard::identifier::ArxivId;
//!
//! let id: ArxivId = "astro-ph/0701019v2".parse().unwrap();
//! assert_eq!(id.archive(), "astro-ph");
//! assert_eq!(id.year_month(), "0701");
//! assert_eq!(id.serial(), "019");
//! assert_eq!(id.version(), "v2");
//! assert_eq!(id.stem(), "astro-ph0701019v2");
//!
//! let id: ArxivId = "1211.1574".parse().unwrap();
//! assert_eq!(id.archive(), "");
//! assert_eq!(id.version(), "");
//! assert_eq!(id.stem(), "1211.1574");
//! ```

use super::*;

lazy_static! {
  /// `yymm.NNNN[vN]`
  static ref NEW_STYLE: Regex = Regex::new(r"^([0-9]{4})\.([0-9]{4})(v[0-9]+)?$").unwrap();
  /// `archive/yymmNNN[vN]`
  static ref OLD_STYLE: Regex =
    Regex::new(r"^([-a-z]+)/([0-9]{4})([0-9]{3})(v[0-9]+)?$").unwrap();
}

/// A validated arXiv identifier.
///
/// The version suffix is stored as the empty string when absent so that filename construction
/// never has to special-case it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArxivId {
  /// Pre-2007 identifier carrying its archive name, e.g. `astro-ph/0701019`
  Old {
    /// Archive name such as `astro-ph` or `cond-mat`
    archive: String,
    /// Four digit year and month of submission
    yymm:    String,
    /// Three digit serial number within the month
    serial:  String,
    /// Version suffix such as `v2`, or empty
    version: String,
  },
  /// Identifier without an archive name, e.g. `1211.1574`
  New {
    /// Four digit year and month of submission
    yymm:    String,
    /// Four digit serial number within the month
    serial:  String,
    /// Version suffix such as `v2`, or empty
    version: String,
  },
}

/// Is this an old-style identifier (`archive/yymmNNN[vN]`)?
pub fn is_old(s: &str) -> bool { OLD_STYLE.is_match(s) }

/// Is this a new-style identifier (`yymm.NNNN[vN]`)?
pub fn is_new(s: &str) -> bool { NEW_STYLE.is_match(s) }

/// Archive name of an identifier, empty for new-style ids.
pub fn archive(s: &str) -> Result<String> { Ok(s.parse::<ArxivId>()?.archive().to_owned()) }

/// Year and month (`yymm`) of an identifier.
pub fn year_month(s: &str) -> Result<String> {
  Ok(s.parse::<ArxivId>()?.year_month().to_owned())
}

/// Serial number of an identifier within its month.
pub fn serial(s: &str) -> Result<String> { Ok(s.parse::<ArxivId>()?.serial().to_owned()) }

/// Version suffix of an identifier, or the empty string.
pub fn version(s: &str) -> Result<String> { Ok(s.parse::<ArxivId>()?.version().to_owned()) }

/// Directory partition of an identifier, which is its year and month.
pub fn directory_prefix(s: &str) -> Result<String> { year_month(s) }

impl ArxivId {
  /// Archive name, or `""` for new-style identifiers.
  pub fn archive(&self) -> &str {
    match self {
      Self::Old { archive, .. } => archive,
      Self::New { .. } => "",
    }
  }

  /// Four digit year and month of submission.
  pub fn year_month(&self) -> &str {
    match self {
      Self::Old { yymm, .. } | Self::New { yymm, .. } => yymm,
    }
  }

  /// Serial number within the month.
  pub fn serial(&self) -> &str {
    match self {
      Self::Old { serial, .. } | Self::New { serial, .. } => serial,
    }
  }

  /// Version suffix (`v12`), or `""` when the identifier names no version.
  pub fn version(&self) -> &str {
    match self {
      Self::Old { version, .. } | Self::New { version, .. } => version,
    }
  }

  /// The `yymm` directory this identifier's files are partitioned under.
  pub fn directory_prefix(&self) -> &str { self.year_month() }

  /// Whether this is an old-style identifier.
  pub fn is_old(&self) -> bool { matches!(self, Self::Old { .. }) }

  /// Extension-less on-disk base name.
  ///
  /// New-style ids are used verbatim. Old-style ids drop the slash, which matches arXiv's bulk
  /// data convention (`astro-ph/0701019` is stored as `astro-ph0701019`).
  pub fn stem(&self) -> String {
    match self {
      Self::Old { archive, yymm, serial, version } => format!("{archive}{yymm}{serial}{version}"),
      Self::New { .. } => self.to_string(),
    }
  }
}

impl FromStr for ArxivId {
  type Err = OverheardError;

  fn from_str(s: &str) -> Result<Self> {
    let version = |m: Option<regex::Match>| m.map(|m| m.as_str().to_owned()).unwrap_or_default();

    if let Some(caps) = NEW_STYLE.captures(s) {
      return Ok(Self::New {
        yymm:    caps[1].to_owned(),
        serial:  caps[2].to_owned(),
        version: version(caps.get(3)),
      });
    }
    if let Some(caps) = OLD_STYLE.captures(s) {
      return Ok(Self::Old {
        archive: caps[1].to_owned(),
        yymm:    caps[2].to_owned(),
        serial:  caps[3].to_owned(),
        version: version(caps.get(4)),
      });
    }
    Err(OverheardError::InvalidIdentifier(s.to_owned()))
  }
}

impl TryFrom<String> for ArxivId {
  type Error = OverheardError;

  fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<ArxivId> for String {
  fn from(id: ArxivId) -> Self { id.to_string() }
}

impl Display for ArxivId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Old { archive, yymm, serial, version } =>
        write!(f, "{archive}/{yymm}{serial}{version}"),
      Self::New { yymm, serial, version } => write!(f, "{yymm}.{serial}{version}"),
    }
  }
}
