use serde::{Deserialize, Serialize};

/// Configuration for the search box of the generated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Whether the search box is shown
  pub enable: bool,

  /// Whether matches are highlighted inside section content
  pub highlight: bool,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      enable:    true,
      highlight: true,
    }
  }
}
