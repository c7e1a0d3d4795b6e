//! The dossier corpus: an ordered, validated list of sections.
use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{
  error::{CorpusError, CorpusResult},
  html,
  markdown,
  outline::{OutlineEntry, build_outline},
  search::{FilterOutcome, Query, filter_sections},
  types::Section,
};

/// File extensions recognised as section files.
pub const SECTION_EXTENSIONS: &[&str] = &["md", "markdown", "html", "htm"];

#[derive(Deserialize)]
struct RawDossier {
  #[serde(default)]
  title:    String,
  sections: Vec<Section>,
}

/// A complete document: a title and its sections in reading order.
///
/// Section titles are unique and so are their ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDossier")]
pub struct Dossier {
  title:    String,
  sections: Vec<Section>,
}

impl TryFrom<RawDossier> for Dossier {
  type Error = CorpusError;

  fn try_from(raw: RawDossier) -> CorpusResult<Self> {
    Self::new(raw.title, raw.sections)
  }
}

impl Dossier {
  /// Create a dossier, checking that it has sections and that no two
  /// sections share a title or an id.
  ///
  /// # Errors
  ///
  /// Returns [`CorpusError::EmptyCorpus`] or
  /// [`CorpusError::DuplicateSection`].
  pub fn new(
    title: impl Into<String>,
    sections: Vec<Section>,
  ) -> CorpusResult<Self> {
    if sections.is_empty() {
      return Err(CorpusError::EmptyCorpus);
    }

    let mut titles = HashSet::with_capacity(sections.len());
    let mut ids = HashSet::with_capacity(sections.len());
    for section in &sections {
      if !titles.insert(section.title()) || !ids.insert(section.id()) {
        return Err(CorpusError::DuplicateSection {
          title: section.title().to_string(),
          id:    section.id().to_string(),
        });
      }
    }

    Ok(Self {
      title: title.into(),
      sections,
    })
  }

  /// Parse a JSON corpus document (`{"title": ..., "sections": [...]}`).
  ///
  /// # Errors
  ///
  /// Returns an error if the JSON is malformed or the corpus is invalid.
  pub fn from_json(json: &str) -> CorpusResult<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Read a JSON corpus document from disk.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not a valid corpus.
  pub fn from_json_file(path: &Path) -> CorpusResult<Self> {
    let content = read(path)?;
    Self::from_json(&content)
  }

  /// Load every section file under `dir`, ordered by path.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be read or the result is invalid.
  pub fn load_dir(dir: &Path, title: impl Into<String>) -> CorpusResult<Self> {
    let files = collect_section_files(dir);
    info!("Found {} section files in {}", files.len(), dir.display());
    Self::load_files(&files, title)
  }

  /// Load the given section files, keeping their order.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be read, has an unsupported
  /// extension, or the result is invalid.
  pub fn load_files(
    files: &[PathBuf],
    title: impl Into<String>,
  ) -> CorpusResult<Self> {
    let sections = files
      .par_iter()
      .map(|path| load_section_file(path))
      .collect::<CorpusResult<Vec<_>>>()?;
    Self::new(title, sections)
  }

  #[must_use]
  pub fn title(&self) -> &str {
    &self.title
  }

  #[must_use]
  pub fn sections(&self) -> &[Section] {
    &self.sections
  }

  /// Look a section up by id.
  #[must_use]
  pub fn section(&self, id: &str) -> Option<&Section> {
    self.sections.iter().find(|section| section.id() == id)
  }

  /// Sections visible for `query`.
  #[must_use]
  pub fn filter(&self, query: &Query) -> FilterOutcome<'_> {
    filter_sections(&self.sections, query)
  }

  /// Outline for `query`.
  #[must_use]
  pub fn outline(&self, query: &Query) -> Vec<OutlineEntry> {
    build_outline(&self.sections, query)
  }
}

fn read(path: &Path) -> CorpusResult<String> {
  fs::read_to_string(path).map_err(|source| {
    CorpusError::Io {
      path: path.to_path_buf(),
      source,
    }
  })
}

fn is_section_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| {
      SECTION_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    })
}

/// Parse a single section file, choosing the parser by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its extension is not
/// supported.
pub fn load_section_file(path: &Path) -> CorpusResult<Section> {
  let content = read(path)?;
  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().to_string())
    .unwrap_or_default();

  let ext = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase);

  debug!("Loading section file {}", path.display());
  match ext.as_deref() {
    Some("md" | "markdown") => Ok(markdown::parse_section(&content, &stem)),
    Some("html" | "htm") => Ok(html::parse_section(&content, &stem)),
    _ => Err(CorpusError::UnsupportedFormat(path.to_path_buf())),
  }
}

/// Collect all section files under `dir`, sorted by path.
#[must_use]
pub fn collect_section_files(dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(dir)
    .follow_links(true)
    .into_iter()
    .filter_map(|entry| {
      entry
        .inspect_err(|e| warn!("Skipping unreadable directory entry: {e}"))
        .ok()
    })
    .map(walkdir::DirEntry::into_path)
    .filter(|path| path.is_file() && is_section_file(path))
    .collect();
  files.sort();
  files
}
