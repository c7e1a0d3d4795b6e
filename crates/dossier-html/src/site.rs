use std::{fs, path::Path};

use color_eyre::eyre::{self, Context, Result};
use dossier_config::Config;
use dossier_core::{Dossier, OutlineEntry, Query, Section};
use dossier_templates as templates;
use log::{debug, info};
use serde::Serialize;

use crate::template::{DATA_PATH, get_template_content, render_page};

/// Client-side data file read by the live search: the corpus plus its
/// unfiltered outline.
#[derive(Debug, Serialize)]
struct DossierData<'a> {
  title:    &'a str,
  sections: &'a [Section],
  outline:  Vec<OutlineEntry>,
}

/// Write the complete viewer into `config.output_dir`.
///
/// Produces `index.html`, `assets/style.css`, `assets/main.js`,
/// `assets/dossier.json` and a copy of every configured script.
///
/// # Errors
///
/// Returns an error if the page cannot be rendered or a file cannot be
/// written.
pub fn generate_site(
  config: &Config,
  dossier: &Dossier,
  query: &Query,
) -> Result<()> {
  fs::create_dir_all(&config.output_dir).wrap_err_with(|| {
    format!(
      "Failed to create output directory {}",
      config.output_dir.display()
    )
  })?;

  let html = render_page(config, dossier, query)?;
  let index_path = config.output_dir.join("index.html");
  fs::write(&index_path, html)
    .wrap_err_with(|| format!("Failed to write {}", index_path.display()))?;
  info!("Generated {}", index_path.display());

  copy_assets(config)?;
  write_data(config, dossier)?;

  Ok(())
}

/// Copies the stylesheet, the main script and custom scripts to `assets/`.
///
/// # Errors
///
/// Returns an error if any asset cannot be read or written.
pub fn copy_assets(config: &Config) -> Result<()> {
  let assets_dir = config.output_dir.join("assets");
  fs::create_dir_all(&assets_dir)?;

  let css = generate_css(config)?;
  fs::write(assets_dir.join("style.css"), css)
    .wrap_err("Failed to write CSS file")?;

  let main_js = get_template_content(config, "main.js", templates::MAIN_JS)?;
  fs::write(assets_dir.join("main.js"), main_js)
    .wrap_err("Failed to write main.js to assets directory")?;

  copy_script_files(config, &assets_dir)?;
  Ok(())
}

/// The template (or default) stylesheet followed by every custom stylesheet.
fn generate_css(config: &Config) -> Result<String> {
  let mut combined_css =
    get_template_content(config, "default.css", templates::DEFAULT_CSS)?;

  for (index, stylesheet_path) in config.stylesheet_paths.iter().enumerate() {
    let content = fs::read_to_string(stylesheet_path).wrap_err_with(|| {
      format!(
        "Failed to read stylesheet {}: {}",
        index + 1,
        stylesheet_path.display()
      )
    })?;

    combined_css.push_str("\n\n/* Custom Stylesheet ");
    combined_css.push_str(&(index + 1).to_string());
    combined_css.push_str(": ");
    combined_css.push_str(&stylesheet_path.display().to_string());
    combined_css.push_str(" */\n");
    combined_css.push_str(&content);
  }

  Ok(combined_css)
}

fn copy_script_files(config: &Config, assets_dir: &Path) -> Result<()> {
  for script_path in &config.script_paths {
    let file_name = script_path
      .file_name()
      .ok_or_else(|| eyre::eyre!("Invalid script filename"))?;
    let dest_path = assets_dir.join(file_name);

    fs::copy(script_path, &dest_path).wrap_err_with(|| {
      format!(
        "Failed to copy script from {} to {}",
        script_path.display(),
        dest_path.display()
      )
    })?;
    debug!("Copied script {}", dest_path.display());
  }
  Ok(())
}

fn write_data(config: &Config, dossier: &Dossier) -> Result<()> {
  let data = DossierData {
    title:    dossier.title(),
    sections: dossier.sections(),
    outline:  dossier.outline(&Query::default()),
  };
  let json = serde_json::to_string_pretty(&data)
    .wrap_err("Failed to serialize dossier data")?;

  let path = config.output_dir.join(DATA_PATH);
  fs::write(&path, json)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))
}
