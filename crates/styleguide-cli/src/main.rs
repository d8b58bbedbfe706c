mod sources;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use styleguide_config::Config;
use styleguide_engine::{ParseOptions, Pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "styleguide-cli",
    version,
    about = "Build style-guide sections from KSS stylesheet comments"
)]
struct Cli {
    /// Stylesheet files or directories (defaults to source_paths from the config file)
    paths: Vec<PathBuf>,

    /// Config file to use instead of ~/.config/kss-styleguide/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep header and description text as escaped plain text
    #[arg(long)]
    no_markdown: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    let paths = if cli.paths.is_empty() {
        config.source_paths.clone()
    } else {
        cli.paths
    };
    if paths.is_empty() {
        bail!("No stylesheet paths given and none configured in source_paths");
    }

    let files = sources::scan_stylesheets(&paths, &config)?;
    log::info!("Found {} stylesheets", files.len());
    let sources = sources::load_sources(&files)?;

    let pipeline = Pipeline::new(parse_options(&config, cli.no_markdown));
    let sections = pipeline
        .run(&sources)
        .context("Failed to build style-guide sections")?;

    let json = if cli.compact {
        serde_json::to_string(&sections)?
    } else {
        serde_json::to_string_pretty(&sections)?
    };

    match cli.output.or(config.output) {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} sections to {}", sections.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// An explicit config file must exist; the default one is optional.
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display())),
        None => {
            log::debug!("Config path: {}", Config::config_path().display());
            Ok(Config::load()?.unwrap_or_default())
        }
    }
}

fn parse_options(config: &Config, no_markdown: bool) -> ParseOptions {
    ParseOptions {
        markdown: config.parser.markdown && !no_markdown,
        param_prefix: config.parser.param_prefix.clone(),
    }
}
