use std::{io, path::PathBuf};

use thiserror::Error;

use crate::templates::TemplateError;

/// Errors raised while loading, validating or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Invalid override, value or path setting.
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Template error: {0}")]
  Template(#[from] TemplateError),

  /// A config or template file could not be read or written.
  #[error("I/O error on {}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error("Failed to parse JSON config {}: {source}", .path.display())]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("Failed to parse TOML config {}: {source}", .path.display())]
  Toml {
    path:   PathBuf,
    source: toml::de::Error,
  },

  #[error("Unsupported config file format: {}", .path.display())]
  UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
