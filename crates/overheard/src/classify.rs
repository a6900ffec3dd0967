//! Content classification of untyped files.
//!
//! Downloads from `arxiv.org/e-print/` carry no extension, and a gunzipped submission can be
//! LaTeX, a tar archive, PostScript, or something stranger. Classification works on the
//! free-text description a content sniffer produces (the output of the `file` utility by
//! default) using plain substring rules:
//!
//! | description contains   | kind                         |
//! |------------------------|------------------------------|
//! | `PDF document`         | [`ContentKind::Pdf`]         |
//! | `gzip compressed data` | [`ContentKind::Gzip`]        |
//! | `tar archive`          | [`ContentKind::Tar`]         |
//! | `text`                 | [`ContentKind::TextLike`]    |
//! | `TeX DVI`              | [`ContentKind::Other`]       |
//! | anything else          | [`ContentKind::Unrecognized`] |
//!
//! The `text` rule is deliberately loose. `file` reports plenty of valid LaTeX as C++ source,
//! "ISO-8859 text", or other odd things, and anything mentioning text is treated as LaTeX.
//!
//! The sniffer itself sits behind the [`Sniffer`] trait so the rules above can be fed from a
//! different source, e.g. the in-process [`MagicBytes`] sniffer.

use tokio::io::AsyncReadExt;

use super::*;

/// What a file turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
  /// A PDF document; nothing to extract
  Pdf,
  /// A gzip stream that needs decompressing
  Gzip,
  /// A tar archive that needs unpacking
  Tar,
  /// Anything described as text, treated as LaTeX
  TextLike,
  /// Recognized but deliberately ignored (e.g. DVI)
  Other,
  /// Nothing matched; carries the sniffer's description for diagnostics
  Unrecognized(String),
}

impl ContentKind {
  /// Applies the substring rules to a sniffer description.
  pub fn from_description(description: &str) -> Self {
    if description.contains("PDF document") {
      Self::Pdf
    } else if description.contains("gzip compressed data") {
      Self::Gzip
    } else if description.contains("tar archive") {
      Self::Tar
    } else if description.contains("text") {
      Self::TextLike
    } else if description.contains("TeX DVI") {
      Self::Other
    } else {
      Self::Unrecognized(description.trim().to_owned())
    }
  }
}

impl Display for ContentKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Pdf => write!(f, "pdf"),
      Self::Gzip => write!(f, "gzip"),
      Self::Tar => write!(f, "tar"),
      Self::TextLike => write!(f, "text"),
      Self::Other => write!(f, "other"),
      Self::Unrecognized(description) => write!(f, "unrecognized ({description})"),
    }
  }
}

/// Something that can describe a file's contents in words.
///
/// Implementors only provide [`Sniffer::describe`]; [`Sniffer::classify`] maps the description
/// through [`ContentKind::from_description`].
#[async_trait]
pub trait Sniffer: Send + Sync + std::fmt::Debug {
  /// Human-readable description of the file at `path`.
  async fn describe(&self, path: &Path) -> Result<String>;

  /// Classifies the file at `path`.
  async fn classify(&self, path: &Path) -> Result<ContentKind> {
    let description = self.describe(path).await?;
    trace!("{} described as: {}", path.display(), description.trim());
    Ok(ContentKind::from_description(&description))
  }
}

/// Sniffs files with the external `file` utility.
#[derive(Debug, Clone)]
pub struct FileCommand {
  /// Program to invoke
  program: PathBuf,
}

impl Default for FileCommand {
  fn default() -> Self { Self { program: PathBuf::from("file") } }
}

impl FileCommand {
  /// Uses `file` from the `PATH`.
  pub fn new() -> Self { Self::default() }

  /// Uses a specific `file`-compatible program.
  pub fn with_program(program: impl AsRef<Path>) -> Self {
    Self { program: program.as_ref().to_path_buf() }
  }
}

#[async_trait]
impl Sniffer for FileCommand {
  async fn describe(&self, path: &Path) -> Result<String> {
    // `file` trips over its own magic database in non-C locales.
    let output = tokio::process::Command::new(&self.program)
      .arg("-b")
      .arg(path)
      .env("LC_ALL", "C")
      .env("LANG", "C")
      .output()
      .await
      .map_err(|e| {
        OverheardError::Sniff(format!("failed to run {}: {e}", self.program.display()))
      })?;

    if !output.status.success() {
      return Err(OverheardError::Sniff(format!(
        "{} exited with {}: {}",
        self.program.display(),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
  }
}

/// Number of leading bytes [`MagicBytes`] looks at.
const SNIFF_LEN: u64 = 8192;

/// In-process sniffer producing `file`-style descriptions from leading bytes.
///
/// Recognizes PDF, gzip, POSIX tar, DVI, and text. Everything else is `data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicBytes;

impl MagicBytes {
  /// Creates the sniffer.
  pub fn new() -> Self { Self }

  /// Describes a byte prefix.
  pub fn describe_bytes(bytes: &[u8]) -> &'static str {
    if bytes.is_empty() {
      return "empty";
    }
    if bytes.starts_with(b"%PDF-") {
      return "PDF document";
    }
    if bytes.starts_with(&[0x1f, 0x8b]) {
      return "gzip compressed data";
    }
    if bytes.len() >= 262 && &bytes[257..262] == b"ustar" {
      return "POSIX tar archive";
    }
    if bytes.starts_with(&[0xf7, 0x02]) {
      return "TeX DVI file";
    }
    if bytes.contains(&0) {
      return "data";
    }
    match std::str::from_utf8(bytes) {
      Ok(text) if text.is_ascii() => "ASCII text",
      Ok(_) => "UTF-8 Unicode text",
      // a multi-byte character cut off by the prefix window
      Err(e) if e.error_len().is_none() => "UTF-8 Unicode text",
      Err(_) => {
        let printable = bytes
          .iter()
          .filter(|&&b| b >= 0x20 || b == b'\n' || b == b'\r' || b == b'\t' || b == 0x0c)
          .count();
        if printable * 100 >= bytes.len() * 95 {
          "ISO-8859 text"
        } else {
          "data"
        }
      },
    }
  }
}

#[async_trait]
impl Sniffer for MagicBytes {
  async fn describe(&self, path: &Path) -> Result<String> {
    let file = tokio::fs::File::open(path).await?;
    let mut prefix = Vec::new();
    file.take(SNIFF_LEN).read_to_end(&mut prefix).await?;
    Ok(Self::describe_bytes(&prefix).to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_descriptions_from_file_utility() {
    let cases = [
      ("PDF document, version 1.4", ContentKind::Pdf),
      ("gzip compressed data, was \"ms.tex\", from Unix", ContentKind::Gzip),
      ("POSIX tar archive (GNU)", ContentKind::Tar),
      ("LaTeX 2e document, ASCII text", ContentKind::TextLike),
      ("C++ source, ISO-8859 text, with very long lines", ContentKind::TextLike),
      ("TeX DVI file (TeX output 2007.01.02:1200)", ContentKind::Other),
    ];
    for (description, kind) in cases {
      assert_eq!(ContentKind::from_description(description), kind, "{description}");
    }
  }

  #[test]
  fn test_unrecognized_keeps_description() {
    assert_eq!(
      ContentKind::from_description("Minix filesystem, V2, 51878 zones\n"),
      ContentKind::Unrecognized("Minix filesystem, V2, 51878 zones".into())
    );
    assert_eq!(ContentKind::from_description("data"), ContentKind::Unrecognized("data".into()));
  }

  #[test]
  fn test_magic_bytes() {
    assert_eq!(MagicBytes::describe_bytes(b"%PDF-1.5\n%\xe2\xe3"), "PDF document");
    assert_eq!(MagicBytes::describe_bytes(&[0x1f, 0x8b, 0x08, 0x00]), "gzip compressed data");
    assert_eq!(MagicBytes::describe_bytes(&[0xf7, 0x02, 0x01, 0x83]), "TeX DVI file");
    assert_eq!(MagicBytes::describe_bytes(b"\\documentclass{article}\n"), "ASCII text");
    assert_eq!(MagicBytes::describe_bytes("caf\u{e9} % note\n".as_bytes()), "UTF-8 Unicode text");
    assert_eq!(MagicBytes::describe_bytes(b"caf\xe9 % note\n"), "ISO-8859 text");
    assert_eq!(MagicBytes::describe_bytes(&[0x00, 0x01, 0x02, 0xff]), "data");
    assert_eq!(MagicBytes::describe_bytes(b""), "empty");

    let mut tar_header = vec![0u8; 512];
    tar_header[..8].copy_from_slice(b"ms.tex\0\0");
    tar_header[257..263].copy_from_slice(b"ustar\0");
    assert_eq!(MagicBytes::describe_bytes(&tar_header), "POSIX tar archive");
  }

  #[tokio::test]
  async fn test_magic_bytes_classify() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("1211.1574");
    fs::write(&path, b"\\section{Results}\n% TODO fix typo\n").unwrap();
    assert_eq!(MagicBytes.classify(&path).await.unwrap(), ContentKind::TextLike);

    let path = dir.path().join("1211.2577");
    fs::write(&path, b"%PDF-1.4\n").unwrap();
    assert_eq!(MagicBytes.classify(&path).await.unwrap(), ContentKind::Pdf);

    assert!(MagicBytes.classify(&dir.path().join("missing")).await.is_err());
  }

  #[tokio::test]
  async fn test_missing_sniffer_program() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("paper");
    fs::write(&path, b"text").unwrap();

    let sniffer = FileCommand::with_program(dir.path().join("no-such-file-utility"));
    assert!(matches!(sniffer.classify(&path).await, Err(OverheardError::Sniff(_))));
  }

  #[ignore = "Requires the `file` utility to be installed."]
  #[tokio::test]
  async fn test_file_command() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("paper");
    fs::write(&path, b"\\documentclass{article}\n\\begin{document}\nHi\n\\end{document}\n").unwrap();
    assert_eq!(FileCommand::new().classify(&path).await.unwrap(), ContentKind::TextLike);
  }
}
