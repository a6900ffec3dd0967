//! On-disk layout of raw and normalized artifacts.
//!
//! The source tree follows the layout of arXiv's bulk source data: one directory per `yymm`,
//! holding either `<stem>.gz` or `<stem>.pdf` per paper. Bulk archives can therefore be dropped
//! into `source_root` as-is. Normalized LaTeX lives in a parallel tree as `<stem>.tex`.
//!
//! ```text
//! source_root/0701/astro-ph0701019.gz      latex_root/0701/astro-ph0701019.tex
//! source_root/1211/1211.2577.pdf           latex_root/1211/1211.2577.tex
//! ```

use super::*;

/// Extensions a raw artifact may carry, in lookup order.
pub const RAW_EXTENSIONS: [&str; 2] = ["gz", "pdf"];

/// Maps identifiers onto the source and LaTeX trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  /// Root of the raw source tree
  source_root: PathBuf,
  /// Root of the normalized LaTeX tree
  latex_root:  PathBuf,
}

impl Layout {
  /// Creates a layout over the given roots.
  pub fn new(source_root: impl AsRef<Path>, latex_root: impl AsRef<Path>) -> Self {
    Self {
      source_root: source_root.as_ref().to_path_buf(),
      latex_root:  latex_root.as_ref().to_path_buf(),
    }
  }

  /// Root of the raw source tree.
  pub fn source_root(&self) -> &Path { &self.source_root }

  /// Root of the normalized LaTeX tree.
  pub fn latex_root(&self) -> &Path { &self.latex_root }

  /// `<source_root>/<yymm>/<stem>`, without any extension.
  pub fn raw_path_base(&self, id: &ArxivId) -> PathBuf {
    self.source_root.join(id.directory_prefix()).join(id.stem())
  }

  /// `<source_root>/<yymm>/<stem>.<ext>`.
  pub fn raw_path_with_extension(&self, id: &ArxivId, ext: &str) -> PathBuf {
    with_appended_extension(&self.raw_path_base(id), ext)
  }

  /// Every raw artifact currently on disk for `id`.
  pub fn existing_raw_paths(&self, id: &ArxivId) -> Vec<PathBuf> {
    RAW_EXTENSIONS
      .iter()
      .map(|ext| self.raw_path_with_extension(id, ext))
      .filter(|path| path.is_file())
      .collect()
  }

  /// The cached raw artifact for `id`.
  ///
  /// Fails with [`OverheardError::NotFound`] when nothing is cached and with
  /// [`OverheardError::AmbiguousArtifact`] when both a `.gz` and a `.pdf` exist.
  pub fn raw_path(&self, id: &ArxivId) -> Result<PathBuf> {
    let mut paths = self.existing_raw_paths(id);
    match paths.len() {
      0 => Err(OverheardError::NotFound(id.to_string())),
      1 => Ok(paths.remove(0)),
      _ => Err(OverheardError::AmbiguousArtifact { identifier: id.to_string(), paths }),
    }
  }

  /// `<latex_root>/<yymm>/<stem>.tex`.
  pub fn normalized_path(&self, id: &ArxivId) -> PathBuf {
    self.latex_root.join(id.directory_prefix()).join(format!("{}.tex", id.stem()))
  }
}

/// Creates every missing ancestor directory of `path`.
///
/// `path` names a file; only its parent chain is created. Idempotent.
pub fn ensure_parent_dirs(path: impl AsRef<Path>) -> Result<()> {
  if let Some(parent) = path.as_ref().parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }
  Ok(())
}

/// Appends `.ext` to a path. Stems such as `1211.1574` already contain a dot, so
/// `Path::with_extension` would clobber the serial number.
pub(crate) fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
  let mut os = path.as_os_str().to_owned();
  os.push(".");
  os.push(ext);
  PathBuf::from(os)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layout(root: &Path) -> Layout { Layout::new(root.join("src"), root.join("latex")) }

  #[test]
  fn test_paths() {
    let layout = Layout::new("/data/src", "/data/latex");

    let old: ArxivId = "astro-ph/0701019v2".parse().unwrap();
    assert_eq!(layout.raw_path_base(&old), PathBuf::from("/data/src/0701/astro-ph0701019v2"));
    assert_eq!(
      layout.normalized_path(&old),
      PathBuf::from("/data/latex/0701/astro-ph0701019v2.tex")
    );

    let new: ArxivId = "1211.1574".parse().unwrap();
    assert_eq!(layout.raw_path_base(&new), PathBuf::from("/data/src/1211/1211.1574"));
    assert_eq!(
      layout.raw_path_with_extension(&new, "gz"),
      PathBuf::from("/data/src/1211/1211.1574.gz")
    );
    assert_eq!(layout.normalized_path(&new), PathBuf::from("/data/latex/1211/1211.1574.tex"));
  }

  #[test]
  fn test_raw_path_not_found() {
    let dir = tempdir().unwrap();
    let layout = layout(dir.path());
    let id: ArxivId = "1211.1574".parse().unwrap();
    assert!(matches!(layout.raw_path(&id), Err(OverheardError::NotFound(_))));
  }

  #[test]
  fn test_raw_path_resolves_single_artifact() {
    let dir = tempdir().unwrap();
    let layout = layout(dir.path());
    let id: ArxivId = "astro-ph/0701864".parse().unwrap();

    let pdf = layout.raw_path_with_extension(&id, "pdf");
    ensure_parent_dirs(&pdf).unwrap();
    fs::write(&pdf, b"%PDF-1.4").unwrap();

    assert_eq!(layout.raw_path(&id).unwrap(), pdf);
  }

  #[test]
  fn test_raw_path_ambiguous() {
    let dir = tempdir().unwrap();
    let layout = layout(dir.path());
    let id: ArxivId = "1211.2577".parse().unwrap();

    for ext in RAW_EXTENSIONS {
      let path = layout.raw_path_with_extension(&id, ext);
      ensure_parent_dirs(&path).unwrap();
      fs::write(&path, b"x").unwrap();
    }

    match layout.raw_path(&id) {
      Err(OverheardError::AmbiguousArtifact { identifier, paths }) => {
        assert_eq!(identifier, "1211.2577");
        assert_eq!(paths.len(), 2);
      },
      other => panic!("expected AmbiguousArtifact, got {other:?}"),
    }
  }

  #[test]
  fn test_ensure_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aa").join("bb").join("file.txt");
    ensure_parent_dirs(&path).unwrap();
    assert!(dir.path().join("aa").join("bb").is_dir());
    assert!(!path.exists());

    // second call is a no-op
    ensure_parent_dirs(&path).unwrap();
    ensure_parent_dirs("relative.txt").unwrap();
  }
}
