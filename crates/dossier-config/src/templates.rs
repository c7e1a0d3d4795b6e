use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so that a new user can
/// find their way around every field.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# Dossier Configuration File

# Directory containing the section files (.md, .html), read in path order
input_dir = "dossier"

# A JSON corpus can be used instead of an input directory
# corpus = "dossier.json"

# Explicit, ordered list of section files (overrides input_dir)
# sections = ["relatorio.md", "anexo-1.md", "anexo-2.html"]

# Output directory for the generated viewer
output_dir = "build"

# Title shown in the page header
title = "Dossiê de Avaliação"

# Footer text
footer_text = "Generated with dossier"

# Path to a template directory overriding the embedded templates
# template_dir = "templates"

# Additional stylesheets and scripts copied into the output
# stylesheet_paths = ["assets/custom.css"]
# script_paths = ["assets/custom.js"]

# Search configuration
[search]
# Whether the search box is shown
enable = true

# Whether matches are highlighted inside the sections
highlight = true

# Emphasis of domain terms
[emphasis]
enable = true

# Replaces the built-in vocabulary when set
# terms = ["Governança", "Auditoria", "Blockchain"]
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input_dir": "dossier",
  "output_dir": "build",
  "title": "Dossiê de Avaliação",
  "footer_text": "Generated with dossier",
  "search": {
    "enable": true,
    "highlight": true
  },
  "emphasis": {
    "enable": true,
    "terms": []
  }
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
