use dossier_core::{DEFAULT_VOCABULARY, Emphasizer};
use serde::{Deserialize, Serialize};

/// Configuration for emphasis of domain terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmphasisConfig {
  /// Whether vocabulary terms are emphasised at all
  pub enable: bool,

  /// Terms to emphasise. Replaces the built-in vocabulary when non-empty.
  pub terms: Vec<String>,
}

impl Default for EmphasisConfig {
  fn default() -> Self {
    Self {
      enable: true,
      terms:  Vec::new(),
    }
  }
}

impl EmphasisConfig {
  /// Build the emphasizer for this configuration, or `None` when disabled.
  #[must_use]
  pub fn emphasizer(&self) -> Option<Emphasizer> {
    if !self.enable {
      return None;
    }
    if self.terms.is_empty() {
      Some(Emphasizer::new(DEFAULT_VOCABULARY.iter().copied()))
    } else {
      Some(Emphasizer::new(&self.terms))
    }
  }
}
