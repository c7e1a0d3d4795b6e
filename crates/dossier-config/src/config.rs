use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::{emphasis, error::ConfigError, search};

/// Configuration for the dossier viewer.
///
/// [`Config`] holds everything needed to locate the dossier sources and to
/// build the viewer: input and output locations, page text, template
/// customization, search and emphasis. Fields are typically loaded from a
/// TOML or JSON config file, but can also be set via CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing section files (Markdown or HTML).
  pub input_dir: Option<PathBuf>,

  /// JSON corpus file holding the whole dossier.
  pub corpus: Option<PathBuf>,

  /// Explicit, ordered section files. Takes precedence over `input_dir`.
  pub sections: Vec<PathBuf>,

  /// Output directory for the generated viewer.
  pub output_dir: PathBuf,

  /// Title of the dossier.
  pub title: String,

  /// Text to be inserted in the footer.
  pub footer_text: String,

  /// Path to template directory overriding the embedded templates.
  pub template_dir: Option<PathBuf>,

  /// Paths to custom stylesheets.
  pub stylesheet_paths: Vec<PathBuf>,

  /// Paths to custom JavaScript files.
  pub script_paths: Vec<PathBuf>,

  /// Search configuration.
  pub search: Option<search::SearchConfig>,

  /// Emphasis configuration.
  pub emphasis: Option<emphasis::EmphasisConfig>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:        None,
      corpus:           None,
      sections:         Vec::new(),
      output_dir:       PathBuf::from("build"),
      title:            "Dossiê".to_string(),
      footer_text:      "Generated with dossier".to_string(),
      template_dir:     None,
      stylesheet_paths: Vec::new(),
      script_paths:     Vec::new(),
      search:           None,
      emphasis:         None,
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn optional_path(value: &str) -> Option<PathBuf> {
  if value.is_empty() {
    None
  } else {
    Some(PathBuf::from(value))
  }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
  value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

impl Config {
  /// Whether the search box is enabled. Defaults to true.
  #[must_use]
  pub fn is_search_enabled(&self) -> bool {
    self.search.as_ref().is_none_or(|s| s.enable)
  }

  /// Whether search hits are highlighted. Defaults to true.
  #[must_use]
  pub fn is_highlight_enabled(&self) -> bool {
    self
      .search
      .as_ref()
      .is_none_or(|s| s.enable && s.highlight)
  }

  /// Emphasis settings, falling back to the defaults.
  #[must_use]
  pub fn emphasis(&self) -> emphasis::EmphasisConfig {
    self.emphasis.clone().unwrap_or_default()
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match ext.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Json {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      _ => {
        Err(ConfigError::UnsupportedFormat {
          path: path.to_path_buf(),
        })
      },
    }
  }

  /// Load configuration from the given files (or a discovered one) and apply
  /// `KEY=VALUE` overrides on top.
  ///
  /// Whether a content source is present is checked later, once CLI flags
  /// had a chance to provide one; see [`Config::require_source`].
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for config_path in rest {
        merged.merge(Self::from_file(config_path)?);
      }

      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Check that at least one source of content is configured.
  ///
  /// # Errors
  ///
  /// Returns an error if neither an input directory, a corpus file nor a
  /// list of sections is set.
  pub fn require_source(&self) -> Result<(), ConfigError> {
    if self.input_dir.is_none()
      && self.corpus.is_none()
      && self.sections.is_empty()
    {
      return Err(ConfigError::Config(
        "At least one of input directory, corpus file, or section files must \
         be provided."
          .to_string(),
      ));
    }
    Ok(())
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, the key is
  /// not recognized, or the value cannot be parsed.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Nested keys (`search.enable`) create their
  /// section on first use. List keys take comma-separated values and replace
  /// the current list; an empty value clears optional fields.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value is invalid.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "input_dir" => self.input_dir = optional_path(value),
      "corpus" => self.corpus = optional_path(value),
      "template_dir" => self.template_dir = optional_path(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "title" => self.title = value.to_string(),
      "footer_text" => self.footer_text = value.to_string(),
      "sections" => {
        self.sections = split_list(value).map(PathBuf::from).collect();
      },
      "stylesheet_paths" => {
        self.stylesheet_paths = split_list(value).map(PathBuf::from).collect();
      },
      "script_paths" => {
        self.script_paths = split_list(value).map(PathBuf::from).collect();
      },
      "search.enable" => {
        self.search.get_or_insert_default().enable = parse_bool(key, value)?;
      },
      "search.highlight" => {
        self.search.get_or_insert_default().highlight =
          parse_bool(key, value)?;
      },
      "emphasis.enable" => {
        self.emphasis.get_or_insert_default().enable = parse_bool(key, value)?;
      },
      "emphasis.terms" => {
        self.emphasis.get_or_insert_default().terms =
          split_list(value).map(String::from).collect();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    log::debug!("Applied config override {key}={value}");
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (String, `PathBuf`): Other's value replaces this config's
  ///   value unless it is the default, so a file that omits the key keeps
  ///   the value set by an earlier file
  pub fn merge(&mut self, other: Self) {
    let Self {
      input_dir,
      corpus,
      sections,
      output_dir,
      title,
      footer_text,
      template_dir,
      stylesheet_paths,
      script_paths,
      search,
      emphasis,
    } = other;

    if input_dir.is_some() {
      self.input_dir = input_dir;
    }
    if corpus.is_some() {
      self.corpus = corpus;
    }
    if template_dir.is_some() {
      self.template_dir = template_dir;
    }
    if search.is_some() {
      self.search = search;
    }
    if emphasis.is_some() {
      self.emphasis = emphasis;
    }

    self.sections.extend(sections);
    self.stylesheet_paths.extend(stylesheet_paths);
    self.script_paths.extend(script_paths);

    let defaults = Self::default();
    if output_dir != defaults.output_dir {
      self.output_dir = output_dir;
    }
    if title != defaults.title {
      self.title = title;
    }
    if footer_text != defaults.footer_text {
      self.footer_text = footer_text;
    }
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "dossier.toml",
          "dossier.json",
          ".dossier.toml",
          ".dossier.json",
          ".config/dossier.toml",
          ".config/dossier.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["dossier.toml", "dossier.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Validate all paths specified in the configuration
  ///
  /// # Errors
  ///
  /// Returns an error listing every configured path that does not exist or
  /// has the wrong type.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Some(ref input_dir) = self.input_dir {
      if !input_dir.exists() {
        errors.push(format!(
          "Input directory does not exist: {}",
          input_dir.display()
        ));
      } else if !input_dir.is_dir() {
        errors.push(format!(
          "Input path is not a directory: {}",
          input_dir.display()
        ));
      }
    }

    if let Some(ref corpus) = self.corpus
      && !corpus.is_file()
    {
      errors.push(format!("Corpus file does not exist: {}", corpus.display()));
    }

    if let Some(ref template_dir) = self.template_dir {
      if !template_dir.exists() {
        errors.push(format!(
          "Template directory does not exist: {}",
          template_dir.display()
        ));
      } else if !template_dir.is_dir() {
        errors.push(format!(
          "Template directory path is not a directory: {}",
          template_dir.display()
        ));
      }
    }

    let files = [
      ("Section file", &self.sections),
      ("Stylesheet file", &self.stylesheet_paths),
      ("Script file", &self.script_paths),
    ];
    for (label, paths) in files {
      for (index, path) in paths.iter().enumerate() {
        if !path.exists() {
          errors.push(format!(
            "{label} {} does not exist: {}",
            index + 1,
            path.display()
          ));
        } else if !path.is_file() {
          errors.push(format!(
            "{label} {} is not a file: {}",
            index + 1,
            path.display()
          ));
        }
      }
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;
    fs::write(path, config_content).map_err(|e| ConfigError::io(path, e))?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
    templates: Option<Vec<String>>,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir)
      .map_err(|e| ConfigError::io(output_dir, e))?;

    let all_templates = Self::get_template_sources();
    let templates_to_export: Vec<_> = match templates {
      Some(specified) if !specified.is_empty() => {
        all_templates
          .into_iter()
          .filter(|(name, _)| {
            specified
              .iter()
              .any(|t| name.ends_with(&format!(".{t}")) || t == "all")
          })
          .collect()
      },
      _ => all_templates.into_iter().collect(),
    };

    for (filename, content) in templates_to_export {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content)
        .map_err(|e| ConfigError::io(&file_path, e))?;
      log::info!("Exported template: {}", file_path.display());
    }

    Ok(())
  }

  /// Get mapping of template filenames to their embedded content
  fn get_template_sources() -> HashMap<&'static str, &'static str> {
    dossier_templates::all_templates()
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.input_dir = Some(PathBuf::from("base-input"));

    let mut other = Config::default();
    other.corpus = Some(PathBuf::from("dossier.json"));

    base.merge(other);

    // input_dir should remain from base (other had None)
    assert_eq!(base.input_dir, Some(PathBuf::from("base-input")));
    assert_eq!(base.corpus, Some(PathBuf::from("dossier.json")));
  }

  #[test]
  fn test_config_merge_vec_fields_append() {
    let mut base = Config::default();
    base.stylesheet_paths = vec![PathBuf::from("base.css")];
    base.sections = vec![PathBuf::from("relatorio.md")];

    let mut other = Config::default();
    other.stylesheet_paths = vec![PathBuf::from("override.css")];
    other.sections = vec![PathBuf::from("anexo-1.md")];

    base.merge(other);

    assert_eq!(base.stylesheet_paths, [
      PathBuf::from("base.css"),
      PathBuf::from("override.css")
    ]);
    assert_eq!(base.sections, [
      PathBuf::from("relatorio.md"),
      PathBuf::from("anexo-1.md")
    ]);
  }

  #[test]
  fn test_config_merge_nested() {
    let mut base = Config::default();
    base.search = Some(search::SearchConfig {
      enable: true,
      ..Default::default()
    });

    let mut other = Config::default();
    other.search = Some(search::SearchConfig {
      enable: false,
      ..Default::default()
    });
    other.title = "Anexos".to_string();

    base.merge(other);

    assert!(!base.is_search_enabled());
    assert!(!base.is_highlight_enabled());
    assert_eq!(base.title, "Anexos");
  }

  #[test]
  fn test_apply_overrides_boolean() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "search.highlight=no".to_string(),
        "emphasis.enable=0".to_string(),
      ])
      .unwrap();

    assert!(config.is_search_enabled());
    assert!(!config.is_highlight_enabled());
    assert!(config.emphasis().emphasizer().is_none());
  }

  #[test]
  fn test_apply_overrides_string_and_path() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "title=Dossiê CDE".to_string(),
        "output_dir=/tmp/output".to_string(),
        "input_dir=/tmp/input".to_string(),
      ])
      .unwrap();

    assert_eq!(config.title, "Dossiê CDE");
    assert_eq!(config.output_dir, PathBuf::from("/tmp/output"));
    assert_eq!(config.input_dir, Some(PathBuf::from("/tmp/input")));

    // Empty string clears optional paths
    config.apply_override("input_dir", "").unwrap();
    assert!(config.input_dir.is_none());
  }

  #[test]
  fn test_apply_override_lists() {
    let mut config = Config::default();
    config
      .apply_override("emphasis.terms", "Governança, Auditoria,,")
      .unwrap();
    assert_eq!(config.emphasis().terms, ["Governança", "Auditoria"]);

    config
      .apply_override("sections", "relatorio.md,anexo.html")
      .unwrap();
    assert_eq!(config.sections.len(), 2);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();
    let result = config.apply_overrides(&["no_equals_sign".to_string()]);
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();
    let result = config.apply_override("unknown_key", "value");
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );
  }

  #[test]
  fn test_apply_overrides_invalid_boolean() {
    let mut config = Config::default();
    let result = config.apply_override("search.enable", "maybe");
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));
    assert!(config.is_search_enabled());
  }

  #[test]
  fn test_require_source() {
    let mut config = Config::default();
    assert!(config.require_source().is_err());
    config.corpus = Some(PathBuf::from("dossier.json"));
    assert!(config.require_source().is_ok());
  }

  #[test]
  fn test_from_file_formats() {
    let temp = TempDir::new().unwrap();

    let toml_path = temp.path().join("dossier.toml");
    fs::write(
      &toml_path,
      "title = \"Relatório\"\n[emphasis]\nterms = [\"CDE\"]\n",
    )
    .unwrap();
    let config = Config::from_file(&toml_path).unwrap();
    assert_eq!(config.title, "Relatório");
    assert_eq!(config.emphasis().terms, ["CDE"]);
    assert!(config.emphasis().enable);

    let json_path = temp.path().join("dossier.json");
    fs::write(&json_path, r#"{ "search": { "highlight": false } }"#).unwrap();
    let config = Config::from_file(&json_path).unwrap();
    assert!(config.is_search_enabled());
    assert!(!config.is_highlight_enabled());

    let yaml_path = temp.path().join("dossier.yaml");
    fs::write(&yaml_path, "title: x").unwrap();
    assert!(Config::from_file(&yaml_path).is_err());
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("base.toml");
    let second = temp.path().join("local.toml");
    fs::write(&first, "input_dir = \"docs\"\ntitle = \"Base\"\n").unwrap();
    fs::write(&second, "title = \"Local\"\n").unwrap();

    let config =
      Config::load(&[first, second], &["footer_text=Rodapé".to_string()])
        .unwrap();
    assert_eq!(config.input_dir, Some(PathBuf::from("docs")));
    assert_eq!(config.title, "Local");
    assert_eq!(config.footer_text, "Rodapé");
  }

  #[test]
  fn test_load_keeps_plain_fields_omitted_by_later_files() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("base.toml");
    let local = temp.path().join("local.toml");
    fs::write(
      &base,
      "title = \"Base\"\noutput_dir = \"site\"\nfooter_text = \"Rodapé\"\n",
    )
    .unwrap();
    fs::write(&local, "input_dir = \"docs\"\n").unwrap();

    let config = Config::load(&[base, local], &[]).unwrap();
    assert_eq!(config.title, "Base");
    assert_eq!(config.output_dir, PathBuf::from("site"));
    assert_eq!(config.footer_text, "Rodapé");
    assert_eq!(config.input_dir, Some(PathBuf::from("docs")));
  }

  #[test]
  fn test_from_file_errors() {
    let temp = TempDir::new().unwrap();

    let missing = temp.path().join("missing.toml");
    assert!(matches!(
      Config::from_file(&missing),
      Err(ConfigError::Io { path, .. }) if path == missing
    ));

    let broken_toml = temp.path().join("broken.toml");
    fs::write(&broken_toml, "title = ").unwrap();
    assert!(matches!(
      Config::from_file(&broken_toml),
      Err(ConfigError::Toml { .. })
    ));

    let broken_json = temp.path().join("broken.json");
    fs::write(&broken_json, "{ \"title\": ").unwrap();
    assert!(matches!(
      Config::from_file(&broken_json),
      Err(ConfigError::Json { .. })
    ));

    let yaml = temp.path().join("dossier.yaml");
    fs::write(&yaml, "title: x").unwrap();
    assert!(matches!(
      Config::from_file(&yaml),
      Err(ConfigError::UnsupportedFormat { .. })
    ));

    assert!(matches!(
      Config::generate_default_config("yaml", &temp.path().join("x.yaml")),
      Err(ConfigError::Template(_))
    ));
  }

  #[test]
  fn test_validate_paths() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.input_dir = Some(temp.path().to_path_buf());
    assert!(config.validate_paths().is_ok());

    config.stylesheet_paths = vec![temp.path().join("missing.css")];
    let err = config.validate_paths().unwrap_err().to_string();
    assert!(err.contains("Stylesheet file 1 does not exist"));
  }

  #[test]
  fn test_generate_and_export() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dossier.toml");
    Config::generate_default_config("toml", &path).unwrap();
    assert!(Config::from_file(&path).is_ok());
    assert!(Config::generate_default_config("yaml", &path).is_err());

    let out = temp.path().join("templates");
    Config::export_templates(&out, false, Some(vec!["css".to_string()]))
      .unwrap();
    assert!(out.join("default.css").exists());
    assert!(!out.join("default.html").exists());
  }
}
