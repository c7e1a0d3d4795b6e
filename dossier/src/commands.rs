//! Command implementations. Each command receives the merged configuration;
//! commands that print write to the given writer so they can be tested.
use std::{fs, io::Write, path::Path};

use color_eyre::eyre::{Context, Result, bail};
use dossier_config::Config;
use dossier_core::{Dossier, OutlineEntry, Query, Section};
use log::info;
use serde::Serialize;

use crate::cli::SourceArgs;

/// Apply the content source flags on top of the configuration.
pub fn apply_source_args(config: &mut Config, source: &SourceArgs) {
  if let Some(input_dir) = &source.input_dir {
    config.input_dir = Some(input_dir.clone());
    // An explicit directory on the command line wins over configured files.
    config.sections.clear();
  }
  if let Some(corpus) = &source.corpus {
    config.corpus = Some(corpus.clone());
  }
  if let Some(title) = &source.title {
    config.title.clone_from(title);
  }
}

/// Load the dossier from the configured source.
///
/// A JSON corpus takes precedence, then an explicit list of section files,
/// then the input directory.
///
/// # Errors
///
/// Returns an error if no source is configured or the content cannot be
/// loaded.
pub fn load_dossier(config: &Config) -> Result<Dossier> {
  config.require_source()?;
  config.validate_paths()?;

  let dossier = if let Some(corpus) = &config.corpus {
    info!("Loading corpus {}", corpus.display());
    let dossier = Dossier::from_json_file(corpus).wrap_err_with(|| {
      format!("Failed to load corpus {}", corpus.display())
    })?;
    if dossier.title().is_empty() {
      Dossier::new(config.title.clone(), dossier.sections().to_vec())?
    } else {
      dossier
    }
  } else if !config.sections.is_empty() {
    info!("Loading {} section files", config.sections.len());
    Dossier::load_files(&config.sections, config.title.clone())
      .wrap_err("Failed to load section files")?
  } else if let Some(input_dir) = &config.input_dir {
    Dossier::load_dir(input_dir, config.title.clone()).wrap_err_with(|| {
      format!("Failed to load sections from {}", input_dir.display())
    })?
  } else {
    bail!("No dossier source configured");
  };

  info!(
    "Loaded dossier {:?} with {} sections",
    dossier.title(),
    dossier.sections().len()
  );
  Ok(dossier)
}

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or it cannot
/// be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}",
      output.display()
    )
  })?;

  info!(
    "Configuration file created successfully. Edit it to point at your \
     dossier sources."
  );
  Ok(())
}

/// Export the embedded templates.
///
/// # Errors
///
/// Returns an error if the templates cannot be written.
pub fn export(
  output_dir: &Path,
  force: bool,
  templates: &[String],
) -> Result<()> {
  Config::export_templates(output_dir, force, Some(templates.to_vec()))
    .wrap_err_with(|| {
      format!("Failed to export templates to {}", output_dir.display())
    })
}

/// Build the static viewer.
///
/// # Errors
///
/// Returns an error if the dossier cannot be loaded or the site cannot be
/// written.
pub fn html(config: &Config, query: &Query) -> Result<()> {
  info!("Starting viewer generation...");
  let dossier = load_dossier(config)?;
  dossier_html::generate_site(config, &dossier, query)?;
  info!(
    "Viewer generated successfully in {}",
    config.output_dir.display()
  );
  Ok(())
}

#[derive(Serialize)]
struct SectionSummary<'a> {
  id:    &'a str,
  title: &'a str,
}

#[derive(Serialize)]
struct SearchReport<'a> {
  query:    &'a str,
  sections: Vec<SectionSummary<'a>>,
  outline:  Vec<OutlineEntry>,
}

/// Print the sections matching `query` and the filtered outline.
///
/// # Errors
///
/// Returns an error if the dossier cannot be loaded or the output cannot be
/// written.
pub fn search<W: Write>(
  config: &Config,
  query: &Query,
  json: bool,
  out: &mut W,
) -> Result<()> {
  let dossier = load_dossier(config)?;
  let outcome = dossier.filter(query);
  let outline = dossier.outline(query);

  if json {
    let report = SearchReport {
      query: query.as_str(),
      sections: outcome
        .sections
        .iter()
        .map(|section| {
          SectionSummary {
            id:    section.id(),
            title: section.title(),
          }
        })
        .collect(),
      outline,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    return Ok(());
  }

  if outcome.is_no_results() {
    writeln!(out, "No results for {:?}", query.as_str())?;
    return Ok(());
  }

  writeln!(
    out,
    "{} of {} sections match",
    outcome.sections.len(),
    dossier.sections().len()
  )?;
  for section in &outcome.sections {
    write_section_line(out, section)?;
  }
  writeln!(out)?;
  write_outline(out, &outline)?;
  Ok(())
}

/// Print the outline, optionally filtered by `query`.
///
/// # Errors
///
/// Returns an error if the dossier cannot be loaded or the output cannot be
/// written.
pub fn outline<W: Write>(
  config: &Config,
  query: &Query,
  json: bool,
  out: &mut W,
) -> Result<()> {
  let dossier = load_dossier(config)?;
  let outline = dossier.outline(query);

  if json {
    serde_json::to_writer_pretty(&mut *out, &outline)?;
    writeln!(out)?;
  } else {
    write_outline(out, &outline)?;
  }
  Ok(())
}

fn write_section_line<W: Write>(out: &mut W, section: &Section) -> Result<()> {
  writeln!(out, "  {} (#{})", section.title(), section.id())?;
  Ok(())
}

fn write_outline<W: Write>(
  out: &mut W,
  entries: &[OutlineEntry],
) -> Result<()> {
  for entry in entries {
    let indent = "  ".repeat(usize::from(entry.level.saturating_sub(2)));
    writeln!(out, "{indent}- {} (#{})", entry.title, entry.id)?;
    write_outline(out, &entry.children)?;
  }
  Ok(())
}
