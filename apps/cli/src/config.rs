//! CLI configuration.
//!
//! Layered with the `config` crate: embedded defaults, then `quarry.toml` in
//! the working directory (or the file given with `--config`), then
//! `QUARRY__SECTION__KEY` environment variables. A `.env` file is loaded first.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = r#"
[logging]
level = "warn"
json  = false

[output]
format = "json"
pretty = true
"#;

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compiled query as JSON
    Json,
    /// One `key=value` request parameter per line
    Params,
    /// URL-encoded query string
    Url,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));
        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("quarry").required(false)),
        };

        builder
            .add_source(
                config::Environment::with_prefix("QUARRY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Built-in defaults, without files or environment.
    pub fn defaults() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "logging.level must be one of {}, got '{}'",
                LEVELS.join(", "),
                self.logging.level
            );
        }
        Ok(())
    }
}
