//! Configuration for the unitdc binary
//!
//! Sources, lowest priority first: built-in defaults, a TOML file
//! (`unitdc.toml` in the working directory, or the path given with
//! `--config`), then `UNITDC__SECTION__KEY` environment variables. A `.env`
//! file is loaded into the environment before anything is read.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use unitdc_units::UnitDeclarations;

/// File stem looked up in the working directory when no path is given.
const DEFAULT_CONFIG_NAME: &str = "unitdc";
const ENV_PREFIX: &str = "UNITDC";

/// Longest fraction printed; f64 carries no more significant digits.
const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repl: ReplConfig,
    pub logging: LoggingConfig,
    /// Units added on top of the built-in catalog.
    pub units: UnitDeclarations,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Input prompt; `{}` is replaced by the input counter.
    pub prompt: String,
    /// Digits after the decimal point.
    pub precision: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "In({}): ".to_string(),
            precision: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load from the layered sources described in the module docs.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Parse a TOML document on top of the defaults, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.repl.precision > MAX_PRECISION {
            return Err(format!(
                "repl.precision must be at most {MAX_PRECISION}, got {}",
                self.repl.precision
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err("logging.level must not be empty".to_string());
        }
        Ok(())
    }
}

impl ReplConfig {
    pub fn render_prompt(&self, count: u64) -> String {
        self.prompt.replace("{}", &count.to_string())
    }
}
