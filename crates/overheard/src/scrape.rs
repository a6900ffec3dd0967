//! Comment extraction from normalized LaTeX.
//!
//! Comments are found lexically, line by line, with no attempt to understand LaTeX:
//!
//! - a **long comment** is a run of consecutive lines whose first non-whitespace character is
//!   `%`; whole paragraphs of commented-out prose land here
//! - a **short comment** is the tail of any other line, starting at its first `%`; these are the
//!   asides left at the end of a line of real text
//!
//! A `%` escaped with a backslash (`\%`, a literal percent sign in the typeset output) never
//! starts a comment. A `%` after an escaped backslash (`\\%`) does.
//!
//! ```
//! use overheard::scrape::{long_comments_from_lines, short_comments_from_lines};
//!
//! let lines = ["value = 5 % in meters", "a 50\\% increase", "% whole line", "%  and more"];
//! let short = short_comments_from_lines(&lines);
//! assert_eq!(short.len(), 1);
//! assert_eq!(short[0].text(), "% in meters");
//!
//! let long = long_comments_from_lines(&lines);
//! assert_eq!(long.len(), 1);
//! assert_eq!(long[0].lines(), ["% whole line", "%  and more"]);
//! ```

use encoding_rs::Encoding;

use super::*;

lazy_static! {
  /// Optional whitespace, then a comment running to the end of the line.
  static ref LONG_COMMENT: Regex = Regex::new(r"^\s*(%.*)$").unwrap();
  /// Shortest prefix of ordinary characters and backslash escapes, then the comment.
  static ref SHORT_COMMENT: Regex = Regex::new(r"^(?:[^%\\]|\\.)*?(%.*)$").unwrap();
}

/// One or more consecutive whole-line comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongComment(Vec<String>);

impl LongComment {
  /// The comment's lines, each starting at its `%`.
  pub fn lines(&self) -> &[String] { &self.0 }

  /// The lines joined with newlines.
  pub fn text(&self) -> String { self.0.join("\n") }
}

/// The comment at the end of a line that also holds non-comment content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortComment(String);

impl ShortComment {
  /// The comment, starting at its `%`.
  pub fn text(&self) -> &str { &self.0 }
}

/// Both kinds of comment found in one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
  /// Whole-line comment blocks, in document order
  pub long:  Vec<LongComment>,
  /// End-of-line comments, in document order
  pub short: Vec<ShortComment>,
}

impl Comments {
  /// Runs both passes over the same lines.
  pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
    Self { long: long_comments_from_lines(lines), short: short_comments_from_lines(lines) }
  }

  /// Whether neither pass found anything.
  pub fn is_empty(&self) -> bool { self.long.is_empty() && self.short.is_empty() }
}

/// The comment on a whole-line comment line, or `None` for any other line.
pub fn long_comment_content(line: &str) -> Option<&str> {
  LONG_COMMENT.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// The end-of-line comment on a line, or `None` for whole-line comments and comment-free lines.
pub fn short_comment_content(line: &str) -> Option<&str> {
  if LONG_COMMENT.is_match(line) {
    return None;
  }
  SHORT_COMMENT.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Where the long-comment scanner is.
enum State {
  /// Between comments
  Outside,
  /// Collecting the lines of a comment
  InsideComment(Vec<String>),
}

/// Groups consecutive whole-line comments into [`LongComment`]s.
pub fn long_comments_from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LongComment> {
  let mut result = Vec::new();
  let mut state = State::Outside;
  for line in lines {
    state = match (state, long_comment_content(line.as_ref())) {
      (State::Outside, Some(content)) => State::InsideComment(vec![content.to_owned()]),
      (State::InsideComment(mut comment), Some(content)) => {
        comment.push(content.to_owned());
        State::InsideComment(comment)
      },
      (State::InsideComment(comment), None) => {
        result.push(LongComment(comment));
        State::Outside
      },
      (State::Outside, None) => State::Outside,
    };
  }
  if let State::InsideComment(comment) = state {
    result.push(LongComment(comment));
  }
  result
}

/// Collects the end-of-line comment from every line that has one.
pub fn short_comments_from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ShortComment> {
  lines
    .iter()
    .filter_map(|line| short_comment_content(line.as_ref()))
    .map(|comment| ShortComment(comment.to_owned()))
    .collect()
}

/// Reads a file as lines, using the first encoding that decodes it cleanly.
///
/// Line terminators (`\n`, `\r\n`, or a lone `\r`) and a leading byte order mark are dropped.
pub fn read_lines(path: impl AsRef<Path>, encodings: &[&'static Encoding]) -> Result<Vec<String>> {
  let path = path.as_ref();
  let bytes = fs::read(path)?;
  for encoding in encodings {
    if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes) {
      trace!("Decoded {} as {}", path.display(), encoding.name());
      let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
      return Ok(split_lines(text));
    }
    debug!("{} is not valid {}", path.display(), encoding.name());
  }
  Err(OverheardError::UndecodableFile(path.to_path_buf()))
}

/// Like [`str::lines`], but old Mac files end their lines with a bare `\r`.
fn split_lines(text: &str) -> Vec<String> {
  if text.is_empty() {
    return Vec::new();
  }
  let mut lines: Vec<String> =
    text.split("\r\n").flat_map(|chunk| chunk.split(['\n', '\r'])).map(str::to_owned).collect();
  if text.ends_with(['\n', '\r']) {
    lines.pop();
  }
  lines
}

/// Scrapes comments out of the normalized LaTeX tree.
#[derive(Debug, Clone)]
pub struct Scraper {
  /// Where normalized LaTeX files live
  layout:    Layout,
  /// Encodings tried in order
  encodings: Vec<&'static Encoding>,
  /// Verbosity
  verbose:   bool,
}

impl Scraper {
  /// Creates a scraper; fails if `config` names an unknown encoding.
  pub fn new(config: &Config) -> Result<Self> {
    Ok(Self {
      layout:    config.layout(),
      encodings: config.resolve_encodings()?,
      verbose:   config.verbose,
    })
  }

  /// The lines of `id`'s normalized LaTeX file.
  pub fn read_lines(&self, id: &ArxivId) -> Result<Vec<String>> {
    read_lines(self.layout.normalized_path(id), &self.encodings)
  }

  /// Whole-line comments of `id`.
  pub fn long_comments(&self, id: &ArxivId) -> Result<Vec<LongComment>> {
    Ok(long_comments_from_lines(&self.read_lines(id)?))
  }

  /// End-of-line comments of `id`.
  pub fn short_comments(&self, id: &ArxivId) -> Result<Vec<ShortComment>> {
    Ok(short_comments_from_lines(&self.read_lines(id)?))
  }

  /// Both kinds of comment of `id`, reading the file once.
  pub fn comments(&self, id: &ArxivId) -> Result<Comments> {
    Ok(Comments::from_lines(&self.read_lines(id)?))
  }

  /// Scrapes every identifier and appends the results to two sinks.
  ///
  /// Long comments are written line by line with a blank line after each comment; short
  /// comments one per line. With `snapshot`, every paper's comments are also written there as
  /// a JSON object keyed by identifier. Papers that cannot be scraped are logged and skipped.
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
    let mut collected = BTreeMap::new();
    for id in parse_batch(ids) {
      progress(self.verbose, format!("Scraping comments from {id}"));
      let comments = match self.comments(&id) {
        Ok(comments) => comments,
        Err(e) if e.is_systemic() => return Err(e),
        Err(e) => {
          warn!("Failed to scrape comments from {id}: {e}");
          continue;
        },
      };
      if comments.is_empty() {
        warn!("No comments found in {id}");
      }

      for comment in &comments.long {
        for line in comment.lines() {
          writeln!(long_sink, "{line}")?;
        }
        writeln!(long_sink)?;
      }
      for comment in &comments.short {
        writeln!(short_sink, "{}", comment.text())?;
      }

      if snapshot.is_some() {
        collected.insert(id.to_string(), comments);
      }
    }
    long_sink.flush()?;
    short_sink.flush()?;

    if let Some(path) = snapshot {
      layout::ensure_parent_dirs(path)?;
      let writer = io::BufWriter::new(File::create(path)?);
      serde_json::to_writer_pretty(writer, &collected)?;
      debug!("Wrote comment snapshot for {} papers to {}", collected.len(), path.display());
    }
    Ok(())
  }
}
