use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for dossier
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Dossier: a static viewer for evaluation reports"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Builds the viewer when
  /// omitted.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Where the dossier content comes from, shared by every command that reads
/// it.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SourceArgs {
  /// Directory containing the section files (.md, .html).
  #[arg(short, long)]
  pub input_dir: Option<PathBuf>,

  /// JSON corpus holding the whole dossier.
  #[arg(short = 'j', long)]
  pub corpus: Option<PathBuf>,

  /// Title of the dossier.
  #[arg(short = 'T', long)]
  pub title: Option<String>,
}

/// All supported subcommands for the dossier CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "dossier.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export default templates to a directory for customization.
  Export {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,

    /// Specific templates to export (html, css, js). If not specified,
    /// exports all.
    #[arg(short, long, action = clap::ArgAction::Append)]
    templates: Vec<String>,
  },

  /// Build the static viewer.
  Html {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory for the generated viewer.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Pre-filter and highlight the page with this query.
    #[arg(short, long)]
    query: Option<String>,

    /// Path to directory containing template files overriding the built-in
    /// ones (default.html, default.css, main.js)
    #[arg(long = "template-dir")]
    template_dir: Option<PathBuf>,

    /// Path to custom stylesheet (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Append)]
    stylesheet: Vec<PathBuf>,

    /// Path to custom JavaScript file (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    script: Vec<PathBuf>,

    /// Footer text.
    #[arg(short = 'f', long)]
    footer: Option<String>,
  },

  /// List the sections matching a query and their outline.
  Search {
    /// Text to search for (case-insensitive).
    query: String,

    #[command(flatten)]
    source: SourceArgs,

    /// Print machine-readable JSON.
    #[arg(long)]
    json: bool,
  },

  /// Print the outline of the dossier.
  Outline {
    #[command(flatten)]
    source: SourceArgs,

    /// Only keep entries matching this query.
    #[arg(short, long)]
    query: Option<String>,

    /// Print machine-readable JSON.
    #[arg(long)]
    json: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
