//! quarry - compile search requests into Solr queries
//!
//! `quarry compile request.json` validates a request description and prints the
//! compiled query; `quarry convert filter.json` converts a single client filter.

mod config;
mod logging;
mod request_file;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use quarry_query::{
    FilterConverter, FilterRequest, NativeQuery, QueryCompiler, QueryFilterConverter,
    SolrQueryCompiler,
};
use serde::de::DeserializeOwned;

use crate::config::{Config, OutputConfig, OutputFormat};
use crate::request_file::RequestFile;

#[derive(Debug, Parser)]
#[command(name = "quarry", version, about = "Compile search requests into Solr queries")]
struct Cli {
    /// Configuration file (defaults to ./quarry.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding the configured one
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a request description into a native query
    Compile { path: PathBuf },
    /// Convert a single filter request into a query clause
    Convert { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let compiler = SolrQueryCompiler::new();
    let converter = QueryFilterConverter::new();

    match cli.command {
        Command::Compile { path } => {
            let file: RequestFile = read_json(&path)?;
            let request = file
                .into_request(&converter)
                .with_context(|| format!("Invalid request in {}", path.display()))?;
            let native = compiler.compile(&request);
            println!("{}", render(&native, &config.output)?);
        }
        Command::Convert { path } => {
            let filter: FilterRequest = read_json(&path)?;
            let query = converter
                .convert(&filter)
                .with_context(|| format!("Cannot convert filter in {}", path.display()))?
                .into_value();
            println!("{}", compiler.render(&query));
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "Read input");
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn render(native: &NativeQuery, output: &OutputConfig) -> anyhow::Result<String> {
    Ok(match output.format {
        OutputFormat::Json if output.pretty => serde_json::to_string_pretty(native)?,
        OutputFormat::Json => serde_json::to_string(native)?,
        OutputFormat::Params => native
            .to_params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Url => native.to_query_string(),
    })
}
