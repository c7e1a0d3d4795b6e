use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for loading and validating a dossier corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
  #[error("Failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Invalid corpus JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Unsupported section file format: {}", .0.display())]
  UnsupportedFormat(PathBuf),

  #[error("Duplicate section '{title}' (id '{id}')")]
  DuplicateSection { title: String, id: String },

  #[error("The dossier has no sections")]
  EmptyCorpus,
}

/// Result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;
