//! Normalization of source archives into one LaTeX file per paper.
//!
//! A cached source file is one of:
//!
//! - `<stem>.pdf`, a PDF-only submission with no LaTeX to recover
//! - `<stem>.gz`, which gunzips to a single LaTeX file, a tar archive of the submission, or
//!   something else entirely (PostScript, DVI, HTML, ...)
//!
//! [`Extractor::extract`] copies the source file into a private scratch directory, decompresses
//! and unpacks it there, and concatenates every top-level `.tex` file into
//! `<latex_root>/<yymm>/<stem>.tex`. A paper without any LaTeX still gets an (empty) output file,
//! so scraping never has to care whether a submission had source.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use overheard::{classify::FileCommand, extract::Extractor, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new(Config::default(), Arc::new(FileCommand::new()));
//! let latex = extractor.extract(&"1211.4164".parse()?).await?;
//! println!("LaTeX written to {}", latex.display());
//! # Ok(())
//! # }
//! ```

use flate2::read::MultiGzDecoder;

use super::*;

/// Turns cached source files into normalized LaTeX files.
#[derive(Debug, Clone)]
pub struct Extractor {
  /// Verbosity
  config:       Config,
  /// Where source files are read from and LaTeX files written to
  layout:       Layout,
  /// Identifies what came out of the gzip stream
  sniffer:      Arc<dyn Sniffer>,
  /// Parent of the per-call scratch directories, the system temp dir when unset
  scratch_root: Option<PathBuf>,
}

impl Extractor {
  /// Creates an extractor over the trees described by `config`.
  pub fn new(config: Config, sniffer: Arc<dyn Sniffer>) -> Self {
    let layout = config.layout();
    Self { config, layout, sniffer, scratch_root: None }
  }

  /// Creates scratch directories under `path` instead of the system temp dir.
  pub fn with_scratch_root(mut self, path: impl AsRef<Path>) -> Self {
    self.scratch_root = Some(path.as_ref().to_path_buf());
    self
  }

  /// Writes the normalized LaTeX file for `id` and returns its path.
  ///
  /// The scratch directory is removed before returning, on success and on error.
  ///
  /// A source file that does not decompress or unpack cleanly is logged, and whatever `.tex`
  /// files did come out of it are still written, so every cached paper ends up with a LaTeX
  /// file.
  ///
  /// # Errors
  ///
  /// - [`OverheardError::SourceMissing`] if no source file is cached
  /// - [`OverheardError::AmbiguousArtifact`] if both a `.gz` and a `.pdf` are cached
  /// - sniffer errors and I/O errors on the scratch directory or the output file
  pub async fn extract(&self, id: &ArxivId) -> Result<PathBuf> {
    let raw = match self.layout.raw_path(id) {
      Ok(raw) => raw,
      Err(OverheardError::NotFound(_)) => return Err(OverheardError::SourceMissing(id.to_string())),
      Err(e) => return Err(e),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix("overheard-");
    let scratch = match &self.scratch_root {
      Some(root) => {
        fs::create_dir_all(root)?;
        builder.tempdir_in(root)?
      },
      None => builder.tempdir()?,
    };

    // On error the scratch dir is removed when `scratch` drops.
    let latex = self.extract_in(id, &raw, scratch.path()).await?;
    scratch.close()?;
    Ok(latex)
  }

  /// Does the work of [`Extractor::extract`] inside `scratch`.
  async fn extract_in(&self, id: &ArxivId, raw: &Path, scratch: &Path) -> Result<PathBuf> {
    let file_name = raw.file_name().ok_or_else(|| OverheardError::NotFound(id.to_string()))?;
    let copy = scratch.join(file_name);
    fs::copy(raw, &copy)?;

    if raw.extension().is_some_and(|ext| ext == "gz") {
      progress(self.config.verbose, format!("Decompressing {id}"));
      let stem = scratch.join(id.stem());
      if let Err(e) = gunzip(&copy, &stem) {
        warn!("Failed to decompress source for {id}: {e}");
      }
      // a truncated stream still leaves its leading bytes behind
      if fs::metadata(&stem).is_ok_and(|meta| meta.len() > 0) {
        self.unpack(id, &stem, scratch).await?;
      }
    } else {
      debug!("{id} is a PDF submission, no LaTeX to extract");
    }

    let latex = self.layout.normalized_path(id);
    layout::ensure_parent_dirs(&latex)?;
    let sources = tex_files(scratch)?;
    if sources.is_empty() {
      progress(self.config.verbose, format!("No LaTeX found for {id}, writing an empty file"));
    }
    let mut out = File::create(&latex)?;
    for source in &sources {
      trace!("Appending {} to {}", source.display(), latex.display());
      io::copy(&mut File::open(source)?, &mut out)?;
    }
    out.flush()?;
    Ok(latex)
  }

  /// Dispatches on what the decompressed file turned out to be.
  async fn unpack(&self, id: &ArxivId, stem: &Path, scratch: &Path) -> Result<()> {
    match self.sniffer.classify(stem).await? {
      ContentKind::TextLike => {
        fs::rename(stem, layout::with_appended_extension(stem, "tex"))?;
      },
      ContentKind::Tar => {
        progress(self.config.verbose, format!("Extracting {id}"));
        let mut archive = tar::Archive::new(io::BufReader::new(File::open(stem)?));
        if let Err(e) = archive.unpack(scratch) {
          warn!("Failed to unpack all of {id}, keeping what was extracted: {e}");
        }
      },
      ContentKind::Pdf | ContentKind::Other => {
        debug!("{id} has no LaTeX source");
      },
      kind => warn!("Unknown file type for {id}: {kind}"),
    }
    Ok(())
  }

  /// Extracts every identifier, returning how many LaTeX files were written.
  ///
  /// Papers without a cached source file and other per-paper failures are logged and skipped.
  /// Systemic errors abort the batch.
  pub async fn extract_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<usize> {
    let mut written = 0;
    for id in parse_batch(ids) {
      match self.extract(&id).await {
        Ok(_) => written += 1,
        Err(e) if e.is_systemic() => return Err(e),
        Err(e @ OverheardError::SourceMissing(_)) => warn!("{e}"),
        Err(e) => warn!("Failed to extract LaTeX for {id}: {e}"),
      }
    }
    Ok(written)
  }
}

/// Decompresses `src` into `dst` and removes `src`, like `gunzip`.
fn gunzip(src: &Path, dst: &Path) -> Result<()> {
  let mut decoder = MultiGzDecoder::new(io::BufReader::new(File::open(src)?));
  let mut out = File::create(dst)?;
  io::copy(&mut decoder, &mut out)?;
  fs::remove_file(src)?;
  Ok(())
}

/// Top-level `.tex` files in `dir`, sorted by name.
fn tex_files(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    if entry.file_type()?.is_file() && path.extension().is_some_and(|ext| ext == "tex") {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}
