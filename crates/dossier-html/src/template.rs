use std::{fmt::Write, fs};

use color_eyre::eyre::{Context, Result};
use dossier_config::Config;
use dossier_core::{Dossier, Node, Query, RenderTransform};
use dossier_templates as templates;
use log::debug;
use serde::Serialize;
use tera::Tera;

use crate::render::{render_node, render_nodes, render_outline};

const DEFAULT_TEMPLATE: &str = templates::DEFAULT_TEMPLATE;

/// Location of the client-side data file, relative to the output directory.
pub const DATA_PATH: &str = "assets/dossier.json";

/// A section as handed to the page template.
#[derive(Debug, Serialize)]
struct SectionView {
  id:      String,
  title:   String,
  html:    String,
  open:    bool,
  visible: bool,
}

/// Render the viewer page for `dossier`, filtered and highlighted by `query`.
///
/// Sections are `<details>` blocks. They are all open when no filter is
/// active; with a filter the matching ones are open and the rest are rendered
/// hidden, so the live search in the page can bring them back.
///
/// # Errors
///
/// Returns an error if a custom template cannot be read or the template
/// cannot be rendered.
pub fn render_page(
  config: &Config,
  dossier: &Dossier,
  query: &Query,
) -> Result<String> {
  let mut tera = Tera::default();
  let template_content =
    get_template_content(config, "default.html", DEFAULT_TEMPLATE)?;
  // The .html suffix turns on autoescaping.
  tera
    .add_raw_template("default.html", &template_content)
    .wrap_err("Failed to parse page template")?;

  let highlight_query = if config.is_highlight_enabled() {
    query.clone()
  } else {
    Query::default()
  };
  let transform =
    RenderTransform::new(&highlight_query, config.emphasis().emphasizer());

  let outcome = dossier.filter(query);
  let sections: Vec<SectionView> = dossier
    .sections()
    .iter()
    .map(|section| {
      let visible = outcome.expand.as_ref().is_none_or(|expand| {
        expand.contains(section.id())
      });
      SectionView {
        id:      section.id().to_string(),
        title:   render_node(&transform.apply(&Node::text(section.title()))),
        html:    render_nodes(&transform.apply_all(section.content())),
        open:    visible,
        visible,
      }
    })
    .collect();
  debug!(
    "Rendering {} of {} sections visible",
    outcome.sections.len(),
    sections.len()
  );

  let outline = render_outline(&dossier.outline(query));
  let custom_scripts = generate_custom_scripts(config)?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("title", dossier.title());
  tera_context.insert("site_title", dossier.title());
  tera_context.insert("footer_text", &config.footer_text);
  tera_context.insert("outline", &outline);
  tera_context.insert("sections", &sections);
  tera_context.insert("query", query.as_str());
  tera_context.insert("no_results", &outcome.is_no_results());
  tera_context.insert("generate_search", &config.is_search_enabled());
  tera_context.insert("highlight", &config.is_highlight_enabled());
  tera_context.insert("custom_scripts", &custom_scripts);
  tera_context.insert("stylesheet_path", "assets/style.css");
  tera_context.insert("main_js_path", "assets/main.js");
  tera_context.insert("data_path", DATA_PATH);

  let html = tera
    .render("default.html", &tera_context)
    .wrap_err("Failed to render page template")?;
  Ok(html)
}

/// Get the template content from the template directory or use the default.
///
/// # Errors
///
/// Returns an error if a custom template exists but cannot be read.
pub fn get_template_content(
  config: &Config,
  template_name: &str,
  fallback: &str,
) -> Result<String> {
  if let Some(template_dir) = &config.template_dir {
    let template_path = template_dir.join(template_name);
    if template_path.exists() {
      debug!("Using custom template {}", template_path.display());
      return fs::read_to_string(&template_path).wrap_err_with(|| {
        format!("Failed to read template file: {}", template_path.display())
      });
    }
  }
  Ok(fallback.to_string())
}

/// Script tags for user scripts, which are copied into `assets/`.
fn generate_custom_scripts(config: &Config) -> Result<String> {
  let mut custom_scripts = String::new();
  for script_path in &config.script_paths {
    let Some(file_name) = script_path.file_name() else {
      continue;
    };
    write!(
      custom_scripts,
      "<script defer src=\"assets/{}\"></script>",
      html_escape::encode_double_quoted_attribute(
        &file_name.to_string_lossy()
      )
    )?;
  }
  Ok(custom_scripts)
}
