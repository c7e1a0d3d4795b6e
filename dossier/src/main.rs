use std::io;

use color_eyre::eyre::Result;
use dossier::{
  cli::{Cli, Commands},
  commands,
};
use dossier_config::Config;
use dossier_core::Query;
use log::LevelFilter;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let Cli {
    command,
    config_files,
    config_overrides,
    ..
  } = cli;
  let load_config = || Config::load(&config_files, &config_overrides);
  let stdout = io::stdout();

  match command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => commands::init(&output, &format, force),
    Some(Commands::Export {
      output_dir,
      force,
      templates,
    }) => commands::export(&output_dir, force, &templates),
    Some(Commands::Search {
      query,
      source,
      json,
    }) => {
      let mut config = load_config()?;
      commands::apply_source_args(&mut config, &source);
      commands::search(&config, &Query::new(query), json, &mut stdout.lock())
    },
    Some(Commands::Outline {
      source,
      query,
      json,
    }) => {
      let mut config = load_config()?;
      commands::apply_source_args(&mut config, &source);
      let query = Query::new(query.unwrap_or_default());
      commands::outline(&config, &query, json, &mut stdout.lock())
    },
    Some(Commands::Html {
      source,
      output_dir,
      query,
      template_dir,
      stylesheet,
      script,
      footer,
    }) => {
      let mut config = load_config()?;
      commands::apply_source_args(&mut config, &source);
      if let Some(output_dir) = output_dir {
        config.output_dir = output_dir;
      }
      if template_dir.is_some() {
        config.template_dir = template_dir;
      }
      if let Some(footer) = footer {
        config.footer_text = footer;
      }
      config.stylesheet_paths.extend(stylesheet);
      config.script_paths.extend(script);

      commands::html(&config, &Query::new(query.unwrap_or_default()))
    },
    // Without a subcommand the viewer is built from the configuration alone.
    None => commands::html(&load_config()?, &Query::default()),
  }
}
